//! Vertical list wheel: a drag moves a strip of equally tall items, release
//! with enough speed lets it coast under friction, and it always comes to rest
//! centred on one item.
//!
//! Offsets are in pixels and are `0` with the first item selected, going
//! negative as later items scroll into place. Time is in milliseconds.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WheelTuning {
    pub item_height: f64,
    /// Release speed (px/ms) above which the wheel coasts.
    pub fling_threshold: f64,
    /// Coasting stops below this speed (px/ms).
    pub min_velocity: f64,
    /// Velocity factor applied every frame, below 1.
    pub friction: f64,
    pub frame_ms: f64,
    /// Length of the eased settle onto the nearest item.
    pub snap_ms: f64,
    /// A release this long after the last move carries no speed.
    pub hold_ms: f64,
}

impl Default for WheelTuning {
    fn default() -> Self {
        Self {
            item_height: 40.0,
            fling_threshold: 0.3,
            min_velocity: 0.02,
            friction: 0.95,
            frame_ms: 16.0,
            snap_ms: 150.0,
            hold_ms: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelEvent {
    /// The item under the selection line changed.
    Tick(usize),
    /// Motion ended with this item selected.
    Settled(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Idle,
    Dragging {
        start_y: f64,
        start_offset: f64,
        last_y: f64,
        last_ms: f64,
        velocity: f64,
    },
    Coasting {
        velocity: f64,
    },
    Snapping {
        from: f64,
        to: f64,
        elapsed: f64,
    },
}

#[derive(Clone, Debug)]
pub struct IndexWheel {
    tuning: WheelTuning,
    count: usize,
    offset: f64,
    index: usize,
    motion: Motion,
}

impl IndexWheel {
    /// A wheel over `count` items (at least one) resting on `selected`.
    pub fn new(count: usize, selected: usize, tuning: WheelTuning) -> Self {
        let mut wheel = Self {
            tuning,
            count: count.max(1),
            offset: 0.0,
            index: 0,
            motion: Motion::Idle,
        };
        wheel.select(selected);
        wheel
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn tuning(&self) -> &WheelTuning {
        &self.tuning
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.motion, Motion::Dragging { .. })
    }

    /// True while frames need to be pumped through [`IndexWheel::frame`].
    pub fn is_animating(&self) -> bool {
        matches!(self.motion, Motion::Coasting { .. } | Motion::Snapping { .. })
    }

    /// Jumps to an item without animation, cancelling any motion.
    pub fn select(&mut self, index: usize) {
        self.index = index.min(self.count - 1);
        self.offset = self.offset_for(self.index);
        self.motion = Motion::Idle;
    }

    /// Starts a drag; any coasting or settling in flight is abandoned where
    /// it is.
    pub fn begin_drag(&mut self, y: f64, at_ms: f64) {
        if self.is_animating() {
            debug!(offset = self.offset, "drag interrupts wheel motion");
        }
        self.motion = Motion::Dragging {
            start_y: y,
            start_offset: self.offset,
            last_y: y,
            last_ms: at_ms,
            velocity: 0.0,
        };
    }

    pub fn drag_to(&mut self, y: f64, at_ms: f64) -> Option<WheelEvent> {
        let Motion::Dragging {
            start_y,
            start_offset,
            last_y,
            last_ms,
            velocity,
        } = self.motion
        else {
            return None;
        };
        let elapsed = at_ms - last_ms;
        let velocity = if elapsed > 0.0 {
            (y - last_y) / elapsed
        } else {
            velocity
        };
        self.motion = Motion::Dragging {
            start_y,
            start_offset,
            last_y: y,
            last_ms: at_ms,
            velocity,
        };
        self.offset = self.clamp_offset(start_offset + (y - start_y));
        self.update_index()
    }

    /// Ends the drag. A fast release starts coasting; otherwise the wheel
    /// starts settling (or settles at once when already aligned).
    pub fn release(&mut self, at_ms: f64) -> Option<WheelEvent> {
        let Motion::Dragging {
            last_ms, velocity, ..
        } = self.motion
        else {
            return None;
        };
        let velocity = if at_ms - last_ms > self.tuning.hold_ms {
            0.0
        } else {
            velocity
        };
        if velocity.abs() > self.tuning.fling_threshold {
            debug!(velocity, "wheel coasting");
            self.motion = Motion::Coasting { velocity };
            return None;
        }
        self.start_snap()
    }

    /// Advances coasting or settling by one frame.
    pub fn frame(&mut self) -> Vec<WheelEvent> {
        let mut events = Vec::new();
        match self.motion {
            Motion::Coasting { velocity } => {
                let velocity = velocity * self.tuning.friction;
                let unclamped = self.offset + velocity * self.tuning.frame_ms;
                self.offset = self.clamp_offset(unclamped);
                events.extend(self.update_index());
                let hit_bound = unclamped != self.offset;
                if velocity.abs() < self.tuning.min_velocity || hit_bound {
                    trace!(velocity, hit_bound, "wheel coasting ended");
                    events.extend(self.start_snap());
                } else {
                    self.motion = Motion::Coasting { velocity };
                }
            }
            Motion::Snapping { from, to, elapsed } => {
                let elapsed = elapsed + self.tuning.frame_ms;
                let progress = if self.tuning.snap_ms > 0.0 {
                    (elapsed / self.tuning.snap_ms).min(1.0)
                } else {
                    1.0
                };
                if progress >= 1.0 {
                    self.offset = to;
                    self.motion = Motion::Idle;
                    events.push(WheelEvent::Settled(self.index));
                } else {
                    self.offset = from + (to - from) * ease_out_cubic(progress);
                    self.motion = Motion::Snapping { from, to, elapsed };
                }
            }
            Motion::Idle | Motion::Dragging { .. } => {}
        }
        events
    }

    fn start_snap(&mut self) -> Option<WheelEvent> {
        let to = self.offset_for(self.index);
        if (to - self.offset).abs() < f64::EPSILON {
            self.offset = to;
            self.motion = Motion::Idle;
            return Some(WheelEvent::Settled(self.index));
        }
        self.motion = Motion::Snapping {
            from: self.offset,
            to,
            elapsed: 0.0,
        };
        None
    }

    fn update_index(&mut self) -> Option<WheelEvent> {
        let index = self.index_for(self.offset);
        if index == self.index {
            return None;
        }
        self.index = index;
        Some(WheelEvent::Tick(index))
    }

    fn min_offset(&self) -> f64 {
        -((self.count - 1) as f64) * self.tuning.item_height
    }

    fn clamp_offset(&self, offset: f64) -> f64 {
        offset.clamp(self.min_offset(), 0.0)
    }

    fn offset_for(&self, index: usize) -> f64 {
        -(index as f64) * self.tuning.item_height
    }

    fn index_for(&self, offset: f64) -> usize {
        let raw = (-offset / self.tuning.item_height).round();
        (raw.max(0.0) as usize).min(self.count - 1)
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
