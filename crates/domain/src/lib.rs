pub mod accent;
pub mod config;
pub mod error;
pub mod limits;
pub mod meter;
pub mod settings;

pub use crate::accent::{AccentLevel, AccentPattern};
pub use crate::config::{EngineConfig, RearmFrom};
pub use crate::error::DomainError;
pub use crate::meter::{interval_ms, TimeSignature};
pub use crate::settings::{GapTrainerConfig, Settings, TempoTrainerConfig, TrainerMode};
