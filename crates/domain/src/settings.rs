use serde::{Deserialize, Serialize};

use crate::accent::{AccentLevel, AccentPattern};
use crate::limits::{
    clamp_bpm, clamp_cycle_beats, clamp_interval_measures, clamp_jump_bpm, DEFAULT_BPM,
};
use crate::meter::TimeSignature;

/// Which practice program shapes the click, if any.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrainerMode {
    #[default]
    Off,
    Gap,
    Tempo,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GapTrainerConfig {
    /// Silent beats at the start of each cycle.
    pub gap_beats: u16,
    /// Audible beats that follow the gap.
    pub click_beats: u16,
}

impl GapTrainerConfig {
    pub fn new(gap_beats: i64, click_beats: i64) -> Self {
        Self {
            gap_beats: clamp_cycle_beats(gap_beats),
            click_beats: clamp_cycle_beats(click_beats),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(i64::from(self.gap_beats), i64::from(self.click_beats))
    }

    pub fn cycle_len(&self) -> u64 {
        u64::from(self.gap_beats) + u64::from(self.click_beats)
    }
}

impl Default for GapTrainerConfig {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TempoTrainerConfig {
    /// BPM added each time the interval elapses.
    pub jump_bpm: u16,
    /// Completed measures between jumps.
    pub interval_measures: u16,
}

impl TempoTrainerConfig {
    pub fn new(jump_bpm: i64, interval_measures: i64) -> Self {
        Self {
            jump_bpm: clamp_jump_bpm(jump_bpm),
            interval_measures: clamp_interval_measures(interval_measures),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(i64::from(self.jump_bpm), i64::from(self.interval_measures))
    }
}

impl Default for TempoTrainerConfig {
    fn default() -> Self {
        Self::new(5, 4)
    }
}

/// Every user-editable value of the engine. Setters clamp, and the accent
/// pattern is rebuilt whenever the numerator changes so its length always
/// matches.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Settings {
    bpm: u16,
    signature: TimeSignature,
    accents: AccentPattern,
    gap: GapTrainerConfig,
    tempo_trainer: TempoTrainerConfig,
}

impl Settings {
    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    pub fn signature(&self) -> TimeSignature {
        self.signature
    }

    pub fn accents(&self) -> &AccentPattern {
        &self.accents
    }

    /// The pattern can be edited in place but never resized.
    pub fn accents_mut(&mut self) -> &mut AccentPattern {
        &mut self.accents
    }

    pub fn gap(&self) -> GapTrainerConfig {
        self.gap
    }

    pub fn tempo_trainer(&self) -> TempoTrainerConfig {
        self.tempo_trainer
    }

    pub fn set_bpm(&mut self, bpm: i64) -> u16 {
        self.bpm = clamp_bpm(bpm);
        self.bpm
    }

    pub fn nudge_bpm(&mut self, delta: i64) -> u16 {
        self.set_bpm(i64::from(self.bpm).saturating_add(delta))
    }

    /// Returns true when the numerator actually changed, in which case the
    /// accent pattern was reset to its default.
    pub fn set_numerator(&mut self, numerator: i64) -> bool {
        let next = self.signature.with_numerator(numerator);
        if next.numerator() == self.signature.numerator() {
            return false;
        }
        self.signature = next;
        self.accents = AccentPattern::default_for(next.numerator());
        true
    }

    pub fn set_denominator(&mut self, denominator: i64) -> u8 {
        self.signature = self.signature.with_denominator(denominator);
        self.signature.denominator()
    }

    pub fn set_signature(&mut self, signature: TimeSignature) -> bool {
        self.set_denominator(i64::from(signature.denominator()));
        self.set_numerator(i64::from(signature.numerator()))
    }

    /// Replaces the pattern, padded or truncated to the current numerator.
    pub fn set_accents(&mut self, levels: &[AccentLevel]) {
        self.accents = AccentPattern::fitted(levels, self.signature.numerator());
    }

    pub fn set_gap_beats(&mut self, beats: i64) -> u16 {
        self.gap.gap_beats = clamp_cycle_beats(beats);
        self.gap.gap_beats
    }

    pub fn set_click_beats(&mut self, beats: i64) -> u16 {
        self.gap.click_beats = clamp_cycle_beats(beats);
        self.gap.click_beats
    }

    pub fn set_jump_bpm(&mut self, jump: i64) -> u16 {
        self.tempo_trainer.jump_bpm = clamp_jump_bpm(jump);
        self.tempo_trainer.jump_bpm
    }

    pub fn set_interval_measures(&mut self, measures: i64) -> u16 {
        self.tempo_trainer.interval_measures = clamp_interval_measures(measures);
        self.tempo_trainer.interval_measures
    }

    pub fn beat_interval_ms(&self) -> f64 {
        self.signature.beat_interval_ms(self.bpm)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            signature: TimeSignature::COMMON,
            accents: AccentPattern::default_for(TimeSignature::COMMON.numerator()),
            gap: GapTrainerConfig::default(),
            tempo_trainer: TempoTrainerConfig::default(),
        }
    }
}
