use std::collections::VecDeque;

use pulse_domain::limits::clamp_bpm;
use tracing::debug;

/// Taps further apart than this start a new burst.
pub const TAP_TIMEOUT_MS: f64 = 2_000.0;
/// Only the most recent taps are averaged.
pub const MAX_TAPS: usize = 8;

/// Turns a burst of tap timestamps (milliseconds) into a tempo.
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    taps: VecDeque<f64>,
}

impl TapTempo {
    pub fn new() -> Self {
        Self {
            taps: VecDeque::with_capacity(MAX_TAPS),
        }
    }

    /// Registers a tap and returns the clamped BPM estimate once at least two
    /// taps of the current burst are known.
    pub fn tap(&mut self, at_ms: f64) -> Option<u16> {
        if let Some(&last) = self.taps.back() {
            if at_ms - last > TAP_TIMEOUT_MS {
                debug!(gap_ms = at_ms - last, "tap burst timed out");
                self.taps.clear();
            }
        }
        self.taps.push_back(at_ms);
        while self.taps.len() > MAX_TAPS {
            self.taps.pop_front();
        }
        self.estimate()
    }

    pub fn estimate(&self) -> Option<u16> {
        if self.taps.len() < 2 {
            return None;
        }
        let first = *self.taps.front()?;
        let last = *self.taps.back()?;
        // consecutive intervals telescope to the span
        let mean = (last - first) / (self.taps.len() - 1) as f64;
        if mean <= 0.0 {
            return None;
        }
        let bpm = clamp_bpm((60_000.0 / mean).round() as i64);
        debug!(taps = self.taps.len(), mean_ms = mean, bpm, "tap estimate");
        Some(bpm)
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn reset(&mut self) {
        self.taps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_second_taps_are_120() {
        let mut tapper = TapTempo::new();
        assert_eq!(tapper.tap(0.0), None);
        assert_eq!(tapper.tap(500.0), Some(120));
        assert_eq!(tapper.tap(1_000.0), Some(120));
        assert_eq!(tapper.tap(1_500.0), Some(120));
    }

    #[test]
    fn long_gap_discards_history() {
        let mut tapper = TapTempo::new();
        tapper.tap(0.0);
        assert_eq!(tapper.tap(2_500.0), None);
        assert_eq!(tapper.len(), 1);
        assert_eq!(tapper.tap(3_000.0), Some(120));
    }

    #[test]
    fn keeps_only_recent_taps() {
        let mut tapper = TapTempo::new();
        // a slow start followed by a faster run
        for at in [0.0, 1_000.0, 2_000.0] {
            tapper.tap(at);
        }
        let mut estimate = None;
        for step in 1..=MAX_TAPS {
            estimate = tapper.tap(2_000.0 + step as f64 * 250.0);
        }
        assert_eq!(tapper.len(), MAX_TAPS);
        assert_eq!(estimate, Some(240));
    }

    #[test]
    fn clamps_and_rejects_degenerate_bursts() {
        let mut tapper = TapTempo::new();
        tapper.tap(10.0);
        assert_eq!(tapper.tap(10.0), None);
        tapper.reset();
        tapper.tap(0.0);
        assert_eq!(tapper.tap(50.0), Some(360));
        tapper.reset();
        assert!(tapper.is_empty());
    }
}
