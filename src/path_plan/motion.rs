//! Linear joint space interpolation of a single move, paced at a fixed step rate.

use std::iter::FusedIterator;
use std::time::Duration;

use serde::Serialize;

use crate::kinematic_traits::Joints;

/// Interpolation steps per second of move duration.
pub const STEPS_PER_SECOND: f64 = 20.0;

const MAX_STEPS: usize = usize::MAX - 1;

/// Linear interpolation between two joint vectors, `t` clamped into [0, 1].
pub fn interpolate_joints(start: &[f64], end: &[f64], t: f64) -> Joints {
    if t <= 0.0 {
        return start.to_vec();
    } else if t >= 1.0 {
        return end.to_vec();
    }
    start.iter().zip(end).map(|(s, e)| s + t * (e - s)).collect()
}

/// One element of the move: angles to command, then how long to wait before the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionStep {
    pub angles: Joints,
    pub wait: Duration,
}

/// A validated move from the chain's current angles to a target.
///
/// The sequence is lazy and can be iterated any number of times. It yields
/// `steps() + 1` elements: the start, the intermediate vectors, and the target
/// itself. All waits are `duration / steps` except the last, which is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionCommand {
    start: Joints,
    target: Joints,
    steps: usize,
    interval: Duration,
    duration: Duration,
}

impl MotionCommand {
    /// Both vectors must have the same length and the target must already be validated.
    /// The step count saturates so that the element count still fits in `usize`.
    pub(crate) fn new(start: Joints, target: Joints, duration: Duration) -> Self {
        let steps = ((duration.as_secs_f64() * STEPS_PER_SECOND).floor() as usize).clamp(1, MAX_STEPS);
        let interval = match u32::try_from(steps) {
            Ok(steps) => duration / steps,
            Err(_) => duration.div_f64(steps as f64),
        };
        MotionCommand { start, target, steps, interval, duration }
    }

    pub fn start(&self) -> &[f64] {
        &self.start
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Number of intervals, at least 1.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of elements the sequence yields.
    pub fn len(&self) -> usize {
        self.steps + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Wait between two consecutive elements.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Requested duration of the whole move.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Element `k` of the sequence, `None` past the end.
    pub fn step(&self, k: usize) -> Option<MotionStep> {
        if k > self.steps {
            return None;
        }
        if k == self.steps {
            return Some(MotionStep { angles: self.target.clone(), wait: Duration::ZERO });
        }
        let t = k as f64 / self.steps as f64;
        Some(MotionStep { angles: interpolate_joints(&self.start, &self.target, t), wait: self.interval })
    }

    pub fn iter(&self) -> MotionSteps<'_> {
        MotionSteps { motion: self, next: 0 }
    }
}

/// Iterator over the elements of a [`MotionCommand`].
pub struct MotionSteps<'a> {
    motion: &'a MotionCommand,
    next: usize,
}

impl Iterator for MotionSteps<'_> {
    type Item = MotionStep;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.motion.step(self.next)?;
        self.next += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.motion.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MotionSteps<'_> {}

impl FusedIterator for MotionSteps<'_> {}

impl<'a> IntoIterator for &'a MotionCommand {
    type Item = MotionStep;
    type IntoIter = MotionSteps<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
