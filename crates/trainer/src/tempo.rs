use pulse_domain::limits::clamp_bpm;
use pulse_domain::TempoTrainerConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Raises the tempo by a fixed jump every few measures and remembers where
/// it started so the session can be undone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TempoTrainer {
    baseline: Option<u16>,
    measures: u16,
}

impl TempoTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session from `bpm`.
    pub fn activate(&mut self, bpm: u16) {
        debug!(baseline = bpm, "tempo trainer activated");
        self.baseline = Some(bpm);
        self.measures = 0;
    }

    pub fn is_active(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Option<u16> {
        self.baseline
    }

    /// Measures completed since the last jump.
    pub fn measures(&self) -> u16 {
        self.measures
    }

    pub fn reset_count(&mut self) {
        self.measures = 0;
    }

    /// Counts a finished measure. Returns the raised tempo when this
    /// measure triggers a jump.
    pub fn on_measure_complete(&mut self, config: &TempoTrainerConfig, bpm: u16) -> Option<u16> {
        self.baseline?;
        self.measures += 1;
        if self.measures < config.interval_measures {
            return None;
        }
        self.measures = 0;
        let raised = clamp_bpm(i64::from(bpm) + i64::from(config.jump_bpm));
        info!(from = bpm, to = raised, "tempo trainer jump");
        Some(raised)
    }

    /// The tempo to restore now that the session is over, if one was
    /// running. The trainer stays configured but inactive.
    pub fn deactivate(&mut self) -> Option<u16> {
        self.measures = 0;
        let baseline = self.baseline.take();
        if let Some(bpm) = baseline {
            debug!(baseline = bpm, "tempo trainer restoring baseline");
        }
        baseline
    }

    /// Like [`TempoTrainer::deactivate`] but keeps the session armed so the
    /// next run starts from the same baseline.
    pub fn restore(&mut self) -> Option<u16> {
        self.measures = 0;
        self.baseline
    }
}
