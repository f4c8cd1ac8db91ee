use std::sync::Arc;

use pulse_domain::AccentLevel;
use pulse_engine::{BeatEvent, BeatSink};
use tokio::sync::Notify;

/// Prints one line per beat to stdout and rings `done` after `limit` beats.
pub struct ConsoleSink {
    json: bool,
    beats: u64,
    limit: Option<u64>,
    done: Arc<Notify>,
}

impl ConsoleSink {
    pub fn new(json: bool, limit: Option<u64>, done: Arc<Notify>) -> Self {
        Self {
            json,
            beats: 0,
            limit,
            done,
        }
    }

    fn render(&self, event: &BeatEvent) -> String {
        if self.json {
            return serde_json::to_string(event).unwrap_or_default();
        }
        let mark = match event.level {
            AccentLevel::Accent => "TOCK",
            AccentLevel::Normal => "tick",
            AccentLevel::Ghost => " .  ",
            AccentLevel::Mute => "    ",
        };
        format!(
            "{:>5} {:>2} {mark} {}",
            event.absolute + 1,
            event.position,
            if event.is_accent { "*" } else { "" }
        )
    }
}

impl BeatSink for ConsoleSink {
    fn on_beat(&mut self, _level: AccentLevel, _is_accent: bool) {}

    fn on_beat_visual(&mut self, _is_accent: bool) {}

    fn on_event(&mut self, event: &BeatEvent) {
        self.beats += 1;
        println!("{}", self.render(event).trim_end());
        if self.limit == Some(self.beats) {
            self.done.notify_one();
        }
    }
}
