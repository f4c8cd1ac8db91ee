use pulse_domain::limits::{
    DENOMINATORS, MAX_BPM, MAX_CYCLE_BEATS, MAX_INTERVAL_MEASURES, MAX_JUMP_BPM, MAX_NUMERATOR,
    MIN_BPM, MIN_CYCLE_BEATS, MIN_INTERVAL_MEASURES, MIN_JUMP_BPM, MIN_NUMERATOR,
};
use pulse_domain::Settings;
use serde::{Deserialize, Serialize};

/// Every numeric value a gesture or keypad can edit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    Bpm,
    Numerator,
    Denominator,
    GapBeats,
    ClickBeats,
    JumpBpm,
    IntervalMeasures,
}

impl Setting {
    pub fn bounds(self) -> (u16, u16) {
        match self {
            Setting::Bpm => (MIN_BPM, MAX_BPM),
            Setting::Numerator => (u16::from(MIN_NUMERATOR), u16::from(MAX_NUMERATOR)),
            Setting::Denominator => (
                u16::from(DENOMINATORS[0]),
                u16::from(DENOMINATORS[DENOMINATORS.len() - 1]),
            ),
            Setting::GapBeats | Setting::ClickBeats => (MIN_CYCLE_BEATS, MAX_CYCLE_BEATS),
            Setting::JumpBpm => (MIN_JUMP_BPM, MAX_JUMP_BPM),
            Setting::IntervalMeasures => (MIN_INTERVAL_MEASURES, MAX_INTERVAL_MEASURES),
        }
    }

    /// Number of entries a list wheel shows for this setting.
    pub fn choices(self) -> usize {
        match self {
            Setting::Denominator => DENOMINATORS.len(),
            other => {
                let (min, max) = other.bounds();
                usize::from(max - min) + 1
            }
        }
    }

    /// Value of wheel entry `index`, clamped to the last entry.
    pub fn value_at(self, index: usize) -> i64 {
        let index = index.min(self.choices() - 1);
        match self {
            Setting::Denominator => i64::from(DENOMINATORS[index]),
            other => i64::from(other.bounds().0) + index as i64,
        }
    }

    /// Wheel entry showing `value`, or the closest one.
    pub fn index_of(self, value: i64) -> usize {
        match self {
            Setting::Denominator => DENOMINATORS
                .iter()
                .position(|&d| i64::from(d) == value)
                .unwrap_or(2),
            other => {
                let (min, max) = other.bounds();
                (value.clamp(i64::from(min), i64::from(max)) - i64::from(min)) as usize
            }
        }
    }

    pub fn current(self, settings: &Settings) -> i64 {
        match self {
            Setting::Bpm => i64::from(settings.bpm()),
            Setting::Numerator => i64::from(settings.signature().numerator()),
            Setting::Denominator => i64::from(settings.signature().denominator()),
            Setting::GapBeats => i64::from(settings.gap().gap_beats),
            Setting::ClickBeats => i64::from(settings.gap().click_beats),
            Setting::JumpBpm => i64::from(settings.tempo_trainer().jump_bpm),
            Setting::IntervalMeasures => i64::from(settings.tempo_trainer().interval_measures),
        }
    }
}
