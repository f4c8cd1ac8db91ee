use serde::{Deserialize, Serialize};
use tracing::trace;

/// Shape of the speed-dependent gain applied to raw gesture deltas.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DialTuning {
    /// Raw units (degrees for a rotary gesture) per parameter step.
    pub sensitivity: f64,
    /// Multiplier gained per raw unit/ms of gesture speed.
    pub velocity_gain: f64,
    /// Upper bound of the multiplier.
    pub max_multiplier: f64,
}

impl Default for DialTuning {
    fn default() -> Self {
        Self {
            sensitivity: 35.0,
            velocity_gain: 4.5,
            max_multiplier: 10.0,
        }
    }
}

impl DialTuning {
    /// Between 1x for a still hand and `max_multiplier` for a fast flick.
    pub fn multiplier(&self, speed: f64) -> f64 {
        (1.0 + speed.abs() * self.velocity_gain).clamp(1.0, self.max_multiplier.max(1.0))
    }
}

/// Converts an unbounded stream of small deltas into whole parameter steps,
/// carrying the fractional remainder between samples.
#[derive(Clone, Debug, Default)]
pub struct DeltaAccumulator {
    tuning: DialTuning,
    remainder: f64,
}

impl DeltaAccumulator {
    pub fn new(tuning: DialTuning) -> Self {
        Self {
            tuning,
            remainder: 0.0,
        }
    }

    /// Feeds one gesture sample. `elapsed_ms` is the time since the previous
    /// sample and only drives the speed multiplier; zero means "slow".
    /// Returns the whole steps to apply, which may be zero.
    pub fn feed(&mut self, delta: f64, elapsed_ms: f64) -> i64 {
        if !delta.is_finite() {
            return 0;
        }
        let speed = if elapsed_ms > 0.0 {
            delta.abs() / elapsed_ms
        } else {
            0.0
        };
        self.remainder += delta / self.tuning.sensitivity * self.tuning.multiplier(speed);
        if self.remainder.abs() < 1.0 {
            return 0;
        }
        let step = self.remainder.trunc();
        self.remainder -= step;
        trace!(step, remainder = self.remainder, "dial step");
        step as i64
    }

    /// Feeds a sample and applies the steps through `apply`, which receives
    /// the step and is expected to clamp. Returns `apply`'s result when a
    /// step happened.
    pub fn feed_into<T>(
        &mut self,
        delta: f64,
        elapsed_ms: f64,
        apply: impl FnOnce(i64) -> T,
    ) -> Option<T> {
        match self.feed(delta, elapsed_ms) {
            0 => None,
            step => Some(apply(step)),
        }
    }

    pub fn remainder(&self) -> f64 {
        self.remainder
    }

    pub fn reset(&mut self) {
        self.remainder = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn one_sensitivity_unit_is_one_step() {
        let mut dial = DeltaAccumulator::default();
        assert_eq!(dial.feed(35.0, 0.0), 1);
        assert_eq!(dial.remainder(), 0.0);
    }

    #[test]
    fn small_motions_are_not_lost() {
        let mut dial = DeltaAccumulator::default();
        let steps: Vec<i64> = (0..8).map(|_| dial.feed(8.75, 0.0)).collect();
        assert_eq!(steps, vec![0, 0, 0, 1, 0, 0, 0, 1]);
        assert_relative_eq!(dial.remainder(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn only_the_applied_integer_is_removed() {
        let mut dial = DeltaAccumulator::default();
        assert_eq!(dial.feed(-87.5, 0.0), -2);
        assert_relative_eq!(dial.remainder(), -0.5, epsilon = 1e-9);
        assert_eq!(dial.feed(17.5, 0.0), 0);
        assert_relative_eq!(dial.remainder(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn fast_motion_multiplies_up_to_cap() {
        let tuning = DialTuning::default();
        assert_relative_eq!(tuning.multiplier(0.0), 1.0);
        assert_relative_eq!(tuning.multiplier(1.0), 5.5);
        assert_relative_eq!(tuning.multiplier(100.0), 10.0);

        let mut dial = DeltaAccumulator::default();
        // 35 units in 1 ms is far past the cap
        assert_eq!(dial.feed(35.0, 1.0), 10);
    }

    #[test]
    fn feed_into_applies_with_clamp() {
        let mut dial = DeltaAccumulator::default();
        let mut bpm: i64 = 359;
        let applied = dial.feed_into(70.0, 0.0, |step| {
            bpm = (bpm + step).min(360);
            bpm
        });
        assert_eq!(applied, Some(360));
        assert_eq!(dial.feed_into(1.0, 0.0, |step| step), None);
    }
}
