use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accent::AccentLevel;
use crate::meter::TimeSignature;
use crate::settings::{GapTrainerConfig, Settings, TempoTrainerConfig, TrainerMode};
use crate::DomainError;

/// Where the next beat is measured from after a timer fires.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RearmFrom {
    /// The time the beat was due. Jitter does not accumulate.
    #[default]
    Target,
    /// The time the timer actually fired.
    FireTime,
}

/// Startup configuration, read from YAML or JSON. Missing keys take their
/// defaults and every number is clamped when turned into [`Settings`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub bpm: i64,
    pub signature: TimeSignature,
    pub accents: Option<Vec<AccentLevel>>,
    pub mode: TrainerMode,
    pub gap: GapTrainerConfig,
    pub tempo_trainer: TempoTrainerConfig,
    /// Delay between a start request and the first beat.
    pub warmup_ms: u64,
    pub rearm: RearmFrom,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bpm: i64::from(crate::limits::DEFAULT_BPM),
            signature: TimeSignature::COMMON,
            accents: None,
            mode: TrainerMode::Off,
            gap: GapTrainerConfig::default(),
            tempo_trainer: TempoTrainerConfig::default(),
            warmup_ms: 50,
            rearm: RearmFrom::Target,
        }
    }
}

impl EngineConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        debug!(path = %path.display(), %extension, "loading engine config");
        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&text),
            "json" => Self::from_json(&text),
            other => Err(DomainError::validation(format!(
                "unsupported config extension {other:?}"
            ))),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(text).map_err(|err| DomainError::Serialization(err.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|err| DomainError::Serialization(err.to_string()))
    }

    /// Clamped settings described by this config.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.set_bpm(self.bpm);
        settings.set_signature(self.signature);
        if let Some(levels) = &self.accents {
            settings.set_accents(levels);
        }
        let gap = self.gap.normalized();
        settings.set_gap_beats(i64::from(gap.gap_beats));
        settings.set_click_beats(i64::from(gap.click_beats));
        let tempo = self.tempo_trainer.normalized();
        settings.set_jump_bpm(i64::from(tempo.jump_bpm));
        settings.set_interval_measures(i64::from(tempo.interval_measures));
        settings
    }
}
