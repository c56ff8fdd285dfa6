use explorer_assets::MouseViewMode;
use explorer_core::{ViewParameters, Viewport};

/// Turning speed in qtvr mode, radians per second for a pointer held one
/// viewport height away from where it was pressed.
pub const QTVR_SPEED: f64 = 2.0;

/// Speed of the on-screen view buttons, radians per second.
pub const BUTTON_SPEED: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewButton {
    Left,
    Right,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
}

impl ViewButton {
    /// View after holding the button for `dt` seconds.
    pub fn apply(self, view: ViewParameters, dt: f64) -> ViewParameters {
        let step = BUTTON_SPEED * dt;
        let mut next = view;
        match self {
            ViewButton::Left => next.yaw -= step,
            ViewButton::Right => next.yaw += step,
            ViewButton::Up => next.pitch -= step,
            ViewButton::Down => next.pitch += step,
            ViewButton::ZoomIn => next.fov -= step,
            ViewButton::ZoomOut => next.fov += step,
        }
        next
    }
}

/// Turns pointer input into view changes according to the tour's
/// `mouseViewMode`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerControl {
    mode: MouseViewMode,
    anchor: Option<(f64, f64)>,
    last: Option<(f64, f64)>,
}

impl PointerControl {
    pub fn new(mode: MouseViewMode) -> Self {
        Self {
            mode,
            anchor: None,
            last: None,
        }
    }

    pub fn mode(&self) -> MouseViewMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn press(&mut self, x: f64, y: f64) {
        self.anchor = Some((x, y));
        self.last = Some((x, y));
    }

    pub fn release(&mut self) {
        self.anchor = None;
        self.last = None;
    }

    /// Records a pointer move. In drag mode this returns the new view right
    /// away; qtvr mode only updates the velocity picked up by `velocity`.
    pub fn move_to(
        &mut self,
        x: f64,
        y: f64,
        view: ViewParameters,
        viewport: Viewport,
    ) -> Option<ViewParameters> {
        let (last_x, last_y) = self.last?;
        self.last = Some((x, y));

        match self.mode {
            MouseViewMode::Drag => {
                // The panorama sticks to the pointer: one viewport height of
                // movement turns the camera by one field of view.
                let per_pixel = view.fov / viewport.height.max(1) as f64;
                Some(ViewParameters {
                    yaw: view.yaw - (x - last_x) * per_pixel,
                    pitch: view.pitch - (y - last_y) * per_pixel,
                    fov: view.fov,
                })
            }
            MouseViewMode::Qtvr => None,
        }
    }

    /// Yaw and pitch velocity in qtvr mode, zero otherwise.
    pub fn velocity(&self, viewport: Viewport) -> (f64, f64) {
        match (self.mode, self.anchor, self.last) {
            (MouseViewMode::Qtvr, Some((ax, ay)), Some((x, y))) => {
                let scale = QTVR_SPEED / viewport.height.max(1) as f64;
                ((x - ax) * scale, (y - ay) * scale)
            }
            _ => (0.0, 0.0),
        }
    }
}
