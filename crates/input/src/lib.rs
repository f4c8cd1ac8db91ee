pub mod accent_drag;
pub mod dial;
pub mod entry;
pub mod tap;
pub mod wheel;

pub use accent_drag::{AccentDrag, DragOutcome};
pub use dial::{DeltaAccumulator, DialTuning};
pub use entry::{EntryFeedback, EntryKey, NumericEntry};
pub use tap::TapTempo;
pub use wheel::{IndexWheel, WheelEvent, WheelTuning};
