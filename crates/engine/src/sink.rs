use std::sync::{Arc, Mutex};

use pulse_domain::AccentLevel;
use tracing::debug;

use crate::engine::BeatEvent;

/// Receiver for what the engine decided. Implementations pick sounds and
/// draw; the engine only says what should happen.
pub trait BeatSink: Send {
    /// A beat is due. `level` is already forced to mute when a trainer
    /// silenced it.
    fn on_beat(&mut self, level: AccentLevel, is_accent: bool);

    /// Fired for every beat, muted or not, so the pulse stays visible.
    fn on_beat_visual(&mut self, is_accent: bool);

    /// A list wheel moved onto another item.
    fn on_wheel_tick(&mut self, _index: usize) {}

    /// The full record of a beat, after the trainers have seen it.
    fn on_event(&mut self, _event: &BeatEvent) {}
}

pub struct NullSink;

impl BeatSink for NullSink {
    fn on_beat(&mut self, level: AccentLevel, is_accent: bool) {
        debug!(%level, is_accent, "null sink beat");
    }

    fn on_beat_visual(&mut self, _is_accent: bool) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkCall {
    Beat { level: AccentLevel, is_accent: bool },
    Visual { is_accent: bool },
    WheelTick(usize),
    Event(BeatEvent),
}

/// Keeps every call in order; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Audible levels in order, visual-only calls left out.
    pub fn beat_levels(&self) -> Vec<AccentLevel> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Beat { level, .. } => Some(level),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: SinkCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl BeatSink for RecordingSink {
    fn on_beat(&mut self, level: AccentLevel, is_accent: bool) {
        self.push(SinkCall::Beat { level, is_accent });
    }

    fn on_beat_visual(&mut self, is_accent: bool) {
        self.push(SinkCall::Visual { is_accent });
    }

    fn on_wheel_tick(&mut self, index: usize) {
        self.push(SinkCall::WheelTick(index));
    }

    fn on_event(&mut self, event: &BeatEvent) {
        self.push(SinkCall::Event(*event));
    }
}
