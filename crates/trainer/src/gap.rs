use pulse_domain::GapTrainerConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Silences `gap_beats` out of every `gap_beats + click_beats` beats, after
/// one unmuted measure to settle in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GapTrainer {
    warmed_up: bool,
    counted: u64,
}

impl GapTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.warmed_up = false;
        self.counted = 0;
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }

    /// Beats counted since the warm-up measure ended.
    pub fn counted(&self) -> u64 {
        self.counted
    }

    /// Decides whether the beat about to play is silent, and counts it.
    pub fn on_beat(&mut self, config: &GapTrainerConfig) -> bool {
        if !self.warmed_up {
            return false;
        }
        let position = self.counted % config.cycle_len().max(1);
        self.counted += 1;
        position < u64::from(config.gap_beats)
    }

    pub fn on_measure_complete(&mut self) {
        if !self.warmed_up {
            debug!("gap trainer warm-up measure complete");
            self.warmed_up = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_up_measure_is_never_muted() {
        let config = GapTrainerConfig::new(2, 2);
        let mut trainer = GapTrainer::new();
        let muted: Vec<bool> = (0..4).map(|_| trainer.on_beat(&config)).collect();
        assert_eq!(muted, vec![false; 4]);
        assert_eq!(trainer.counted(), 0);
    }

    #[test]
    fn two_gap_two_click_cycle() {
        let config = GapTrainerConfig::new(2, 2);
        let mut trainer = GapTrainer::new();
        trainer.on_measure_complete();
        let muted: Vec<bool> = (0..8).map(|_| trainer.on_beat(&config)).collect();
        assert_eq!(
            muted,
            vec![true, true, false, false, true, true, false, false]
        );
    }

    #[test]
    fn uneven_cycle_spans_measures() {
        let config = GapTrainerConfig::new(1, 4);
        let mut trainer = GapTrainer::new();
        trainer.on_measure_complete();
        let muted: Vec<bool> = (0..10).map(|_| trainer.on_beat(&config)).collect();
        assert_eq!(
            muted,
            vec![true, false, false, false, false, true, false, false, false, false]
        );
        // later measure boundaries do not restart the cycle
        trainer.on_measure_complete();
        assert!(trainer.on_beat(&config));
    }

    #[test]
    fn reset_restores_warm_up() {
        let config = GapTrainerConfig::new(3, 1);
        let mut trainer = GapTrainer::new();
        trainer.on_measure_complete();
        assert!(trainer.on_beat(&config));
        trainer.reset();
        assert!(!trainer.is_warmed_up());
        assert!(!trainer.on_beat(&config));
    }
}
