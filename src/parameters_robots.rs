//! Hardcoded DH chains for a few arms

use std::f64::consts::FRAC_PI_2;

use crate::parameters::JointSpec;

const FULL_TURN: [f64; 2] = [-180.0, 180.0];
const HALF_TURN: [f64; 2] = [-90.0, 90.0];

/// Two unit links rotating about parallel z axes (planar arm).
pub fn two_link_planar() -> Vec<JointSpec> {
    vec![
        JointSpec::new(1.0, 0.0, 0.0, 0.0, FULL_TURN),
        JointSpec::new(1.0, 0.0, 0.0, 0.0, FULL_TURN),
    ]
}

/// Planar arm with links of 4, 3 and 2 units.
pub fn three_link_planar() -> Vec<JointSpec> {
    vec![
        JointSpec::new(4.0, 0.0, 0.0, 0.0, FULL_TURN),
        JointSpec::new(3.0, 0.0, 0.0, 0.0, FULL_TURN),
        JointSpec::new(2.0, 0.0, 0.0, 0.0, FULL_TURN),
    ]
}

/// Small six axis hobby arm driven by hobby servos, lengths in meters.
pub fn desktop_arm_6dof() -> Vec<JointSpec> {
    vec![
        // Base rotation
        JointSpec::new(0.0, FRAC_PI_2, 0.1, 0.0, FULL_TURN),
        // Shoulder
        JointSpec::new(0.2, 0.0, 0.0, -FRAC_PI_2, HALF_TURN),
        // Elbow
        JointSpec::new(0.15, 0.0, 0.0, 0.0, HALF_TURN),
        // Wrist roll
        JointSpec::new(0.0, FRAC_PI_2, 0.1, 0.0, FULL_TURN),
        // Wrist pitch
        JointSpec::new(0.0, -FRAC_PI_2, 0.0, 0.0, HALF_TURN),
        // Wrist yaw
        JointSpec::new(0.0, 0.0, 0.05, 0.0, FULL_TURN),
    ]
}

/// Looks up a built-in chain by name.
pub fn by_name(name: &str) -> Option<Vec<JointSpec>> {
    match name {
        "two_link_planar" => Some(two_link_planar()),
        "three_link_planar" => Some(three_link_planar()),
        "desktop_arm_6dof" => Some(desktop_arm_6dof()),
        _ => None,
    }
}
