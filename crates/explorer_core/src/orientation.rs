use std::f64::consts::{PI, TAU};

use glam::DVec3;

/// Wraps an angle into the (-PI, PI] range.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Unit direction for a yaw/pitch pair.
///
/// Forward is -Z, right is +X, up is +Y. Positive pitch looks down, which is
/// how the tour data stores hotspot elevations.
pub fn direction_from(yaw: f64, pitch: f64) -> DVec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    DVec3::new(sin_yaw * cos_pitch, -sin_pitch, -cos_yaw * cos_pitch)
}

/// Great-circle angle between two yaw/pitch directions.
pub fn angular_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let da = direction_from(a.0, a.1);
    let db = direction_from(b.0, b.1);
    da.dot(db).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn wrap_keeps_range() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        // 5.5 turns of a half circle lands on -PI/2
        assert!((wrap_angle(17.27875959474387) + FRAC_PI_2).abs() < 1e-9);
        assert!((wrap_angle(4.71238898038469) + FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn directions_follow_conventions() {
        assert!((direction_from(FRAC_PI_2, 0.0) - DVec3::X).length() < 1e-12);
        assert!((direction_from(0.0, -FRAC_PI_2) - DVec3::Y).length() < 1e-12);
        assert!((direction_from(0.0, FRAC_PI_2) - DVec3::NEG_Y).length() < 1e-12);
    }

    #[test]
    fn angular_distance_of_opposites() {
        let d = angular_distance((0.0, 0.0), (PI, 0.0));
        assert!((d - PI).abs() < 1e-9);
        assert!(angular_distance((0.3, 0.1), (0.3, 0.1)).abs() < 1e-6);
    }
}
