use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::orientation::{direction_from, wrap_angle};

/// Camera orientation inside a panorama. All angles are radians.
///
/// `yaw` grows to the right, `pitch` grows downwards, `fov` is the vertical
/// field of view.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ViewParameters {
    pub yaw: f64,
    pub pitch: f64,
    pub fov: f64,
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            fov: FRAC_PI_2,
        }
    }
}

impl ViewParameters {
    pub fn new(yaw: f64, pitch: f64, fov: f64) -> Self {
        Self { yaw, pitch, fov }
    }

    /// Unit vector the camera is looking along
    pub fn direction(&self) -> DVec3 {
        direction_from(self.yaw, self.pitch)
    }

    /// Horizontal field of view for a viewport of the given aspect ratio.
    pub fn horizontal_fov(&self, aspect_ratio: f64) -> f64 {
        2.0 * ((self.fov * 0.5).tan() * aspect_ratio).atan()
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.fov.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// Bounds applied to user-driven view changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewLimits {
    pub min_fov: f64,
    pub max_vfov: f64,
    pub max_hfov: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
}

// Same caps the panorama tiler's generated viewer passes to its limiter
pub const MAX_VFOV: f64 = 100.0 * PI / 180.0;
pub const MAX_HFOV: f64 = 120.0 * PI / 180.0;

impl ViewLimits {
    /// Limits for a cube map whose faces are `face_size` pixels wide.
    ///
    /// Zooming stops once one source pixel covers one screen pixel: a face
    /// spans 90 degrees, so the focal length in pixels is `face_size / 2`.
    pub fn traditional(face_size: u32, viewport: Viewport) -> Self {
        let min_fov = if face_size == 0 {
            MAX_VFOV
        } else {
            2.0 * (viewport.height as f64 / face_size as f64).atan()
        };

        Self {
            min_fov,
            max_vfov: MAX_VFOV,
            max_hfov: MAX_HFOV,
            min_pitch: -FRAC_PI_2,
            max_pitch: FRAC_PI_2,
        }
    }

    pub fn clamp(&self, view: ViewParameters, aspect_ratio: f64) -> ViewParameters {
        // The horizontal limit expressed as a vertical fov for this aspect
        let hfov_as_vfov = ViewParameters::new(0.0, 0.0, self.max_hfov)
            .horizontal_fov(1.0 / aspect_ratio.max(f64::EPSILON));
        let upper = self.max_vfov.min(hfov_as_vfov);
        let lower = self.min_fov.min(upper);

        ViewParameters {
            yaw: wrap_angle(view.yaw),
            pitch: view.pitch.clamp(self.min_pitch, self.max_pitch),
            fov: view.fov.clamp(lower, upper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_view_looks_forward() {
        let view = ViewParameters::default();
        let dir = view.direction();
        assert!((dir - DVec3::NEG_Z).length() < 1e-12);
        assert_eq!(view.fov, FRAC_PI_2);
    }

    #[test]
    fn horizontal_fov_widens_with_aspect() {
        let view = ViewParameters::default();
        assert!((view.horizontal_fov(1.0) - FRAC_PI_2).abs() < 1e-12);
        assert!(view.horizontal_fov(16.0 / 9.0) > FRAC_PI_2);
    }

    #[test]
    fn traditional_limits_follow_face_size() {
        let viewport = Viewport { width: 508, height: 508 };
        let limits = ViewLimits::traditional(508, viewport);
        // One face fills the viewport at exactly 90 degrees
        assert!((limits.min_fov - FRAC_PI_2).abs() < 1e-12);

        let sharper = ViewLimits::traditional(2048, viewport);
        assert!(sharper.min_fov < limits.min_fov);
    }

    #[test]
    fn clamp_bounds_pitch_fov_and_wraps_yaw() {
        let limits = ViewLimits::traditional(1024, Viewport { width: 100, height: 100 });
        let clamped = limits.clamp(ViewParameters::new(3.0 * PI, 2.0, 3.0), 1.0);

        assert!((clamped.yaw - PI).abs() < 1e-9);
        assert_eq!(clamped.pitch, FRAC_PI_2);
        assert!((clamped.fov - MAX_VFOV).abs() < 1e-12);

        let zoomed = limits.clamp(ViewParameters::new(0.0, 0.0, 0.0001), 1.0);
        assert_eq!(zoomed.fov, limits.min_fov);
    }

    #[test]
    fn square_viewport_keeps_right_angle_fov() {
        let limits = ViewLimits::traditional(512, Viewport { width: 400, height: 400 });
        let view = ViewParameters::default();
        assert_eq!(limits.clamp(view, 1.0).fov, view.fov);
    }

    #[test]
    fn wide_viewport_is_bound_by_horizontal_cap() {
        let limits = ViewLimits::traditional(512, Viewport::default());
        let aspect = Viewport::default().aspect_ratio();
        let clamped = limits.clamp(ViewParameters::new(0.0, 0.0, MAX_VFOV), aspect);

        assert!(clamped.fov < MAX_VFOV);
        assert!((clamped.horizontal_fov(aspect) - MAX_HFOV).abs() < 1e-9);
    }
}
