use std::f64::consts::FRAC_PI_2;

use explorer_core::ViewParameters;

/// Idle spin applied once the viewer has been left alone for a while.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Autorotate {
    pub yaw_speed: f64,
    pub target_pitch: f64,
    pub target_fov: f64,
    /// How fast pitch and fov drift back to their targets, radians per second
    pub settle_speed: f64,
}

impl Default for Autorotate {
    fn default() -> Self {
        Self {
            yaw_speed: 0.03,
            target_pitch: 0.0,
            target_fov: FRAC_PI_2,
            settle_speed: 0.1,
        }
    }
}

impl Autorotate {
    pub fn step(&self, view: ViewParameters, dt: f64) -> ViewParameters {
        let settle = self.settle_speed * dt;
        ViewParameters {
            yaw: view.yaw + self.yaw_speed * dt,
            pitch: approach(view.pitch, self.target_pitch, settle),
            fov: approach(view.fov, self.target_fov, settle),
        }
    }
}

fn approach(value: f64, target: f64, max_step: f64) -> f64 {
    let delta = target - value;
    if delta.abs() <= max_step {
        target
    } else {
        value + max_step.copysign(delta)
    }
}
