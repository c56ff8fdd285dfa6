use explorer_core::CubeFace;

use crate::{error::TourError, scene::Scene};

pub const TILE_ROOT: &str = "tiles";

/// Upper bound on the paths [`level_tiles`] will list for one level.
pub const MAX_LEVEL_TILES: u64 = 1 << 20;

/// Location of one tile: `tiles/{scene}/{level}/{face}/{row}/{column}.jpg`.
///
/// Levels are numbered from 1 in the order the scene lists them, matching
/// the directory layout the panorama tiler writes.
pub fn tile_path(scene_id: &str, level: usize, face: CubeFace, x: u32, y: u32) -> String {
    format!("{TILE_ROOT}/{scene_id}/{level}/{}/{y}/{x}.jpg", face.letter())
}

/// Low resolution cube strip shown while tiles stream in.
pub fn preview_path(scene_id: &str) -> String {
    format!("{TILE_ROOT}/{scene_id}/preview.jpg")
}

/// Every tile path of one level of a scene, face by face, row by row.
pub fn level_tiles(scene: &Scene, level_index: usize) -> Result<Vec<String>, TourError> {
    let level = scene
        .levels
        .get(level_index)
        .ok_or_else(|| TourError::IndexOutOfRange {
            scene: scene.id.clone(),
            index: level_index,
            count: scene.levels.len(),
        })?;

    let count = level.tile_count();
    if count > MAX_LEVEL_TILES {
        return Err(TourError::MalformedGraph(format!(
            "scene '{}' level {level_index} has {count} tiles, more than {MAX_LEVEL_TILES}",
            scene.id
        )));
    }

    let per_side = level.tiles_per_side();
    let mut paths = Vec::with_capacity(count as usize);

    for face in CubeFace::ALL {
        for y in 0..per_side {
            for x in 0..per_side {
                paths.push(tile_path(&scene.id, level_index + 1, face, x, y));
            }
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Level;
    use explorer_core::ViewParameters;

    fn scene() -> Scene {
        Scene {
            id: "3-rumtekcourtyard".into(),
            name: "rumtekcourtyard".into(),
            levels: vec![Level::fallback(256, 256), Level::new(512, 1024)],
            face_size: 1024,
            initial_view_parameters: ViewParameters::default(),
            link_hotspots: vec![],
            info_hotspots: vec![],
        }
    }

    #[test]
    fn tile_path_layout() {
        assert_eq!(
            tile_path("3-rumtekcourtyard", 2, CubeFace::Up, 1, 0),
            "tiles/3-rumtekcourtyard/2/u/0/1.jpg"
        );
        assert_eq!(preview_path("0-a"), "tiles/0-a/preview.jpg");
    }

    #[test]
    fn level_tiles_cover_all_faces() {
        let paths = level_tiles(&scene(), 1).unwrap();
        assert_eq!(paths.len(), 6 * 4);
        assert_eq!(paths[0], "tiles/3-rumtekcourtyard/2/f/0/0.jpg");
        assert_eq!(paths.last().unwrap(), "tiles/3-rumtekcourtyard/2/d/1/1.jpg");

        assert_eq!(level_tiles(&scene(), 0).unwrap().len(), 6);
    }

    #[test]
    fn oversized_level_is_refused() {
        let mut scene = scene();
        scene.levels.push(Level::new(1, 70_000));
        assert!(matches!(
            level_tiles(&scene, 2),
            Err(TourError::MalformedGraph(_))
        ));
    }

    #[test]
    fn level_tiles_rejects_unknown_level() {
        assert!(matches!(
            level_tiles(&scene(), 2),
            Err(TourError::IndexOutOfRange { index: 2, count: 2, .. })
        ));
    }
}
