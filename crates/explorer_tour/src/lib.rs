//! Viewer session: which scene is showing and where the camera points.

use explorer_assets::{InfoHotspot, Scene, SceneIndex, Tour, TourError};
use explorer_core::{ViewLimits, ViewParameters, Viewport, time::IdleClock};
use log::{debug, warn};

pub mod autorotate;
pub mod control;

pub use autorotate::Autorotate;
pub use control::{PointerControl, ViewButton};

/// Seconds without input before autorotation kicks in
pub const IDLE_DELAY: f64 = 3.0;

/// Navigation state for one viewer. Borrows the tour it walks through;
/// failed operations never change the state.
#[derive(Clone, Debug)]
pub struct ViewerSession<'a> {
    tour: &'a Tour,
    current: SceneIndex,
    view: ViewParameters,
    viewport: Viewport,
    pointer: PointerControl,
    idle: IdleClock,
    autorotate: Option<Autorotate>,
}

impl<'a> ViewerSession<'a> {
    /// Starts at the tour's entry scene with its initial view.
    pub fn new(tour: &'a Tour) -> Result<Self, TourError> {
        let entry = tour.entry_scene()?;
        let settings = tour.settings();

        Ok(Self {
            tour,
            current: SceneIndex(0),
            view: entry.initial_view_parameters,
            viewport: Viewport::default(),
            pointer: PointerControl::new(settings.mouse_view_mode),
            idle: IdleClock::new(IDLE_DELAY),
            autorotate: settings.autorotate_enabled.then(Autorotate::default),
        })
    }

    pub fn tour(&self) -> &'a Tour {
        self.tour
    }

    pub fn current_index(&self) -> SceneIndex {
        self.current
    }

    pub fn current_scene(&self) -> &'a Scene {
        // `current` only ever holds indices handed out by the tour
        &self.tour.scenes()[self.current.0]
    }

    pub fn orientation(&self) -> ViewParameters {
        self.view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn autorotate(&self) -> Option<&Autorotate> {
        self.autorotate.as_ref()
    }

    pub fn set_autorotate(&mut self, autorotate: Option<Autorotate>) {
        self.autorotate = autorotate;
        self.idle.reset();
    }

    /// Switches to `scene_id` and resets the camera to that scene's initial view.
    pub fn activate(&mut self, scene_id: &str) -> Result<&'a Scene, TourError> {
        let Some(index) = self.tour.index_of(scene_id) else {
            warn!("Ignoring activation of unknown scene '{scene_id}'");
            return Err(TourError::NotFound(scene_id.to_owned()));
        };
        Ok(self.enter(index))
    }

    /// Follows link hotspot `link_index` of the current scene.
    pub fn follow_link(&mut self, link_index: usize) -> Result<&'a Scene, TourError> {
        let target = self
            .tour
            .link_target_at(self.current, link_index)
            .inspect_err(|err| warn!("Ignoring navigation: {err}"))?;
        Ok(self.enter(target))
    }

    /// Follows link hotspot `link_index` of `scene_id`.
    pub fn follow_link_from(
        &mut self,
        scene_id: &str,
        link_index: usize,
    ) -> Result<&'a Scene, TourError> {
        let from = self
            .tour
            .index_of(scene_id)
            .ok_or_else(|| TourError::NotFound(scene_id.to_owned()))
            .inspect_err(|err| warn!("Ignoring navigation: {err}"))?;
        let target = self
            .tour
            .link_target_at(from, link_index)
            .inspect_err(|err| warn!("Ignoring navigation: {err}"))?;
        Ok(self.enter(target))
    }

    fn enter(&mut self, index: SceneIndex) -> &'a Scene {
        let scene = &self.tour.scenes()[index.0];
        debug!("Entering scene '{}'", scene.id);

        self.current = index;
        self.view = scene.initial_view_parameters;
        self.pointer.release();
        self.idle.reset();
        scene
    }

    pub fn info_hotspot(&self, index: usize) -> Result<&'a InfoHotspot, TourError> {
        let scene = self.current_scene();
        scene
            .info_hotspots
            .get(index)
            .ok_or_else(|| TourError::IndexOutOfRange {
                scene: scene.id.clone(),
                index,
                count: scene.info_hotspots.len(),
            })
    }

    /// Narration clip attached to info hotspot `index`, if any.
    pub fn narration(&self, index: usize) -> Result<Option<&'a str>, TourError> {
        Ok(self.info_hotspot(index)?.audio_file.as_deref())
    }

    pub fn limits(&self) -> ViewLimits {
        ViewLimits::traditional(self.current_scene().face_size, self.viewport)
    }

    /// Points the camera somewhere, within the current scene's limits.
    pub fn look_to(&mut self, view: ViewParameters) {
        self.view = self.limits().clamp(view, self.viewport.aspect_ratio());
        self.idle.reset();
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer.press(x, y);
        self.idle.reset();
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(view) = self.pointer.move_to(x, y, self.view, self.viewport) {
            self.look_to(view);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer.release();
        self.idle.reset();
    }

    /// Applies an on-screen view button held for `dt` seconds.
    /// Returns false when the tour hides those buttons.
    pub fn press(&mut self, button: ViewButton, dt: f64) -> bool {
        if !self.tour.settings().view_control_buttons {
            return false;
        }
        self.look_to(button.apply(self.view, dt));
        true
    }

    /// Advances time-driven motion: qtvr turning while the pointer is held,
    /// autorotation once the viewer has been idle long enough.
    pub fn tick(&mut self, dt: f64) {
        if self.pointer.is_active() {
            let (yaw_speed, pitch_speed) = self.pointer.velocity(self.viewport);
            let next = ViewParameters {
                yaw: self.view.yaw + yaw_speed * dt,
                pitch: self.view.pitch + pitch_speed * dt,
                fov: self.view.fov,
            };
            self.look_to(next);
            return;
        }

        let idle_time = self.idle.advance(dt);
        if idle_time <= 0.0 {
            return;
        }
        if let Some(autorotate) = self.autorotate {
            let next = autorotate.step(self.view, idle_time);
            self.view = self.limits().clamp(next, self.viewport.aspect_ratio());
        }
    }

    /// True while idle autorotation is driving the view.
    pub fn is_autorotating(&self) -> bool {
        self.autorotate.is_some() && !self.pointer.is_active() && self.idle.is_idle()
    }
}
