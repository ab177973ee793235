use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::actuation::Actuator;
use crate::kinematic_traits::{Joints, Pose};
use crate::motion::{MotionCommand, MotionStep};

/// Same sequence of samples on every run.
pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// One uniform sample per [min, max] range.
pub(crate) fn random_angles(rng: &mut StdRng, ranges: &[[f64; 2]]) -> Joints {
    ranges.iter().map(|[min, max]| rng.gen_range(*min..=*max)).collect()
}

/// Adds a uniform perturbation in [-spread, spread] to every angle.
pub(crate) fn perturb(rng: &mut StdRng, angles: &[f64], spread: f64) -> Joints {
    angles.iter().map(|a| a + rng.gen_range(-spread..=spread)).collect()
}

pub(crate) fn assert_pose_close(actual: &Pose, expected: &Pose, tolerance: f64) {
    let error = actual.error_to(expected).norm();
    assert!(
        error < tolerance,
        "pose {:?} differs from {:?} by {}",
        actual,
        expected,
        error
    );
}

/// Keeps every executed move, succeeds unless told otherwise.
#[derive(Default)]
pub(crate) struct RecordingActuator {
    pub(crate) fail: bool,
    pub(crate) moves: Vec<Vec<MotionStep>>,
}

impl RecordingActuator {
    pub(crate) fn failing() -> Self {
        RecordingActuator { fail: true, moves: Vec::new() }
    }
}

impl Actuator for RecordingActuator {
    fn execute(&mut self, motion: &MotionCommand) -> bool {
        self.moves.push(motion.iter().collect());
        !self.fail
    }
}
