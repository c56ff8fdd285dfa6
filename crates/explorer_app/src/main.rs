use anyhow::Context;
use explorer_assets::{AssetLookup, AssetServer, Tour, tiles};
use explorer_core::orientation::angular_distance;
use explorer_tour::ViewerSession;
use log::{info, warn};

use crate::config::Config;

mod config;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;

    // Dedicated IO pool, the main thread only drives the session
    let io_runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.io_threads)
        .enable_all()
        .thread_name("explorer-io")
        .build()
        .context("Failed to start IO runtime")?;

    let mut server = AssetServer::new(io_runtime.handle().clone());
    let mut lookup = AssetLookup::default();

    let handle = server.load_tour(&config.tour_path);
    let tour = io_runtime
        .block_on(server.wait_for(handle, &mut lookup))
        .with_context(|| format!("Could not load {}", config.tour_path.display()))?;

    print_tour(&tour);

    let mut session = ViewerSession::new(&tour)?;
    print_scene(&session);

    for &link in &config.route {
        match session.follow_link(link) {
            Ok(scene) => {
                info!("Followed link {link} to '{}'", scene.id);
                print_scene(&session);
            }
            Err(err) => warn!("Skipping link {link}: {err}"),
        }
    }

    Ok(())
}

fn print_tour(tour: &Tour) {
    let settings = tour.settings();
    println!("Tour '{}' ({} scenes)", tour.name(), tour.len());
    println!(
        "  view mode: {:?}, autorotate: {}, fullscreen button: {}, view buttons: {}",
        settings.mouse_view_mode,
        settings.autorotate_enabled,
        settings.fullscreen_button,
        settings.view_control_buttons
    );
}

fn print_scene(session: &ViewerSession<'_>) {
    let scene = session.current_scene();
    let view = session.orientation();

    println!();
    println!("[{}] {}", scene.id, scene.name);
    println!(
        "  view: yaw {:.1}°, pitch {:.1}°, fov {:.1}°",
        view.yaw.to_degrees(),
        view.pitch.to_degrees(),
        view.fov.to_degrees()
    );
    println!("  preview: {}", tiles::preview_path(&scene.id));

    for (z, level) in scene.selectable_levels() {
        println!(
            "  level {}: {}px, {}x{} tiles per face",
            z + 1,
            level.size,
            level.tiles_per_side(),
            level.tiles_per_side()
        );
    }

    for (i, link) in scene.link_hotspots.iter().enumerate() {
        let away = angular_distance((view.yaw, view.pitch), (link.yaw, link.pitch));
        println!(
            "  link {i} -> {} ({:.0}° from view, arrow {:.0}°)",
            link.target,
            away.to_degrees(),
            link.arrow_angle().to_degrees()
        );
    }

    for (i, info) in scene.info_hotspots.iter().enumerate() {
        let pixel = scene
            .face_pixel(info.yaw, info.pitch)
            .map(|p| format!("{} {},{}", p.face.letter(), p.x, p.y))
            .unwrap_or_default();
        println!("  info {i}: {} [{pixel}]", info.title);
        if let Ok(Some(audio)) = session.narration(i) {
            println!("    narration: {audio}");
        }
    }
}
