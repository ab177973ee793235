//! Helper functions

use crate::kinematic_traits::{Joints, Pose};
use nalgebra::DVector;

/// Wraps an angle in degrees into the half-open range [-180, 180).
pub fn wrap_degrees(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Checks if all joint values are finite
pub fn is_valid(qs: &[f64]) -> bool {
    qs.iter().all(|&q| q.is_finite())
}

/// Converts ```nalgebra::DVector<f64>``` to Joints
pub fn dvector_to_joints(v: &DVector<f64>) -> Joints {
    v.iter().copied().collect()
}

/// Formats joint values (degrees) as a single bracketed row.
pub fn format_joints(joints: &[f64]) -> String {
    let row = joints
        .iter()
        .map(|q| format!("{:7.2}", q))
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{}]", row.trim_start())
}

/// Print position and roll, pitch, yaw of the pose.
pub fn dump_pose(pose: &Pose) {
    let [x, y, z] = pose.position;
    let [roll, pitch, yaw] = pose.orientation;
    println!(
        "x: {:.5}, y: {:.5}, z: {:.5},  roll: {:.3}, pitch: {:.3}, yaw: {:.3}{}",
        x,
        y,
        z,
        roll,
        pitch,
        yaw,
        if pose.is_degenerate() { " (gimbal lock)" } else { "" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees_inside_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(45.0), 45.0);
        assert_eq!(wrap_degrees(-179.5), -179.5);
    }

    #[test]
    fn test_wrap_degrees_across_seam() {
        assert!((wrap_degrees(179.0 - -179.0) - -2.0).abs() < 1e-12);
        assert!((wrap_degrees(-179.0 - 179.0) - 2.0).abs() < 1e-12);
        assert!((wrap_degrees(540.0) - -180.0).abs() < 1e-12);
        assert!((wrap_degrees(180.0) - -180.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_valid_with_nan() {
        assert!(is_valid(&[0.0, 10.0, -45.0]));
        assert!(!is_valid(&[0.0, f64::NAN, 1.0]));
        assert!(!is_valid(&[f64::INFINITY]));
    }

    #[test]
    fn test_format_joints() {
        assert_eq!(format_joints(&[0.0, 90.0, -12.5]), "[0.00   90.00  -12.50]");
    }
}
