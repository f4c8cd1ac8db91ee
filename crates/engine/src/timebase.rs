//! Beat clock. It only does bookkeeping over millisecond timestamps; the run
//! loop owns the actual waiting and calls [`Timebase::fire`] once the
//! deadline from [`Timebase::due_ms`] has passed.

use pulse_domain::{RearmFrom, TimeSignature};
use serde::Serialize;
use tracing::{debug, trace};

/// A fire this far before its deadline still counts as on time.
const EARLY_TOLERANCE_MS: f64 = 1.0;

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    #[default]
    Idle,
    /// Waiting out the warm-up before beat one.
    Starting,
    Running,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct BeatCursor {
    /// Position of the next beat, `1..=numerator`.
    pub position: u8,
    /// Beats played since the last start.
    pub absolute: u64,
}

impl Default for BeatCursor {
    fn default() -> Self {
        Self {
            position: 1,
            absolute: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct Tick {
    /// One-based position of this beat in its measure.
    pub position: u8,
    /// Zero-based count of this beat since start.
    pub absolute: u64,
    /// This beat was the last of its measure.
    pub measure_complete: bool,
    pub due_ms: f64,
    pub fired_ms: f64,
}

#[derive(Clone, Debug)]
pub struct Timebase {
    state: TransportState,
    cursor: BeatCursor,
    due_ms: Option<f64>,
    warmup_ms: f64,
    rearm: RearmFrom,
}

impl Timebase {
    pub fn new(warmup_ms: f64, rearm: RearmFrom) -> Self {
        Self {
            state: TransportState::Idle,
            cursor: BeatCursor::default(),
            due_ms: None,
            warmup_ms: warmup_ms.max(0.0),
            rearm,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state != TransportState::Idle
    }

    pub fn cursor(&self) -> BeatCursor {
        self.cursor
    }

    /// When the pending beat should fire.
    pub fn due_ms(&self) -> Option<f64> {
        self.due_ms
    }

    /// How long to wait from `now_ms`, never negative.
    pub fn delay_ms(&self, now_ms: f64) -> Option<f64> {
        self.due_ms.map(|due| (due - now_ms).max(0.0))
    }

    /// Arms the warm-up. Returns false, changing nothing, when already
    /// playing.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.is_playing() {
            return false;
        }
        self.state = TransportState::Starting;
        self.cursor = BeatCursor::default();
        self.due_ms = Some(now_ms + self.warmup_ms);
        debug!(now_ms, warmup_ms = self.warmup_ms, "timebase starting");
        true
    }

    /// Drops the pending beat. Returns whether anything was playing.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.is_playing();
        self.state = TransportState::Idle;
        self.due_ms = None;
        if was_playing {
            debug!(beats = self.cursor.absolute, "timebase stopped");
        }
        was_playing
    }

    /// Brings the cursor back inside a measure that just got shorter.
    pub fn fit_measure(&mut self, numerator: u8) {
        if self.cursor.position > numerator {
            self.cursor.position = 1;
        }
    }

    /// Plays the pending beat when it is due and schedules the next one from
    /// the tempo and meter in force right now.
    pub fn fire(&mut self, now_ms: f64, bpm: u16, signature: TimeSignature) -> Option<Tick> {
        let due = self.due_ms?;
        if now_ms + EARLY_TOLERANCE_MS < due {
            return None;
        }
        let numerator = signature.numerator();
        self.fit_measure(numerator);
        self.state = TransportState::Running;

        let position = self.cursor.position;
        let absolute = self.cursor.absolute;
        self.cursor.absolute += 1;
        let measure_complete = position >= numerator;
        self.cursor.position = if measure_complete { 1 } else { position + 1 };

        let interval = signature.beat_interval_ms(bpm);
        let base = match self.rearm {
            RearmFrom::Target if now_ms - due > interval => {
                debug!(late_ms = now_ms - due, "timebase fell behind, resyncing");
                now_ms
            }
            RearmFrom::Target => due,
            RearmFrom::FireTime => now_ms,
        };
        self.due_ms = Some(base + interval);
        trace!(position, absolute, late_ms = now_ms - due, next_ms = base + interval, "beat");

        Some(Tick {
            position,
            absolute,
            measure_complete,
            due_ms: due,
            fired_ms: now_ms,
        })
    }
}
