pub mod gap;
pub mod tempo;

pub use gap::GapTrainer;
pub use tempo::TempoTrainer;
