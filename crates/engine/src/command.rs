use pulse_domain::{AccentLevel, TimeSignature, TrainerMode};
use pulse_input::EntryKey;
use tokio::sync::oneshot;

use crate::engine::Snapshot;
use crate::setting::Setting;

/// Everything the outside world can ask of a running engine. Pointer
/// coordinates are pixels; timestamps come from the run loop's clock.
#[derive(Debug)]
pub enum Command {
    Start,
    Stop,
    Toggle,
    Set(Setting, i64),
    NudgeBpm(i64),
    SetSignature(TimeSignature),
    SetAccents(Vec<AccentLevel>),
    CycleAccent(usize),
    SetMode(TrainerMode),
    Tap,
    /// One sample of a rotary gesture on the tempo dial.
    Rotate { delta: f64, elapsed_ms: f64 },
    WheelPress { setting: Setting, y: f64 },
    WheelMove { y: f64 },
    WheelRelease,
    AccentPress { index: usize, y: f64 },
    AccentMove { index: usize, y: f64 },
    AccentRelease,
    EntryOpen(Setting),
    EntryKey(EntryKey),
    EntryCancel,
    Snapshot(oneshot::Sender<Snapshot>),
    Shutdown,
}
