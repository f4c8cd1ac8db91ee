use pulse_domain::{AccentLevel, AccentPattern};
use tracing::trace;

/// Vertical travel that moves a beat one level.
pub const PIXELS_PER_LEVEL: f64 = 40.0;
/// Pointer travel below this still counts as a tap.
pub const TAP_SLOP_PX: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// The pointer barely moved and the beat was cycled one level.
    Tapped { index: usize, level: AccentLevel },
    /// The gesture set levels by dragging; `index` is where it ended.
    Dragged { index: usize, level: AccentLevel },
}

/// Press-drag-release over the beat indicators. Dragging up raises the level
/// of the beat under the pointer; moving sideways onto another beat
/// continues from that beat's own level.
#[derive(Clone, Copy, Debug)]
pub struct AccentDrag {
    index: usize,
    start_y: f64,
    start_level: AccentLevel,
    moved: bool,
}

impl AccentDrag {
    pub fn begin(pattern: &AccentPattern, index: usize, y: f64) -> Self {
        Self {
            index,
            start_y: y,
            start_level: pattern.level(index),
            moved: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Applies a pointer move. `index` is the beat now under the pointer.
    /// Returns the new level of that beat when it changed.
    pub fn update(
        &mut self,
        pattern: &mut AccentPattern,
        index: usize,
        y: f64,
    ) -> Option<AccentLevel> {
        if index != self.index && index < pattern.len() {
            trace!(from = self.index, to = index, "accent drag crossed beats");
            self.index = index;
            self.start_y = y;
            self.start_level = pattern.level(index);
            self.moved = true;
        }
        let travel = y - self.start_y;
        if travel.abs() >= TAP_SLOP_PX {
            self.moved = true;
        }
        let steps = (-travel / PIXELS_PER_LEVEL).trunc() as i64;
        let level = AccentLevel::from_clamped(i64::from(self.start_level.index()) + steps);
        if self.index >= pattern.len() || level == pattern.level(self.index) {
            return None;
        }
        pattern.set_level(self.index, level);
        self.moved = true;
        Some(level)
    }

    /// Ends the gesture, cycling the beat when it was really a tap. `None`
    /// when the beat is not part of the pattern.
    pub fn finish(self, pattern: &mut AccentPattern) -> Option<DragOutcome> {
        if self.moved {
            return (self.index < pattern.len()).then(|| DragOutcome::Dragged {
                index: self.index,
                level: pattern.level(self.index),
            });
        }
        pattern
            .cycle_level(self.index)
            .map(|level| DragOutcome::Tapped {
                index: self.index,
                level,
            })
    }
}
