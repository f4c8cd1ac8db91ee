pub mod command;
pub mod engine;
pub mod runner;
pub mod setting;
pub mod sink;
pub mod timebase;

pub use command::Command;
pub use engine::{BeatEvent, Engine, Snapshot};
pub use runner::{spawn, Clock, EngineHandle};
pub use setting::Setting;
pub use sink::{BeatSink, NullSink, RecordingSink, SinkCall};
pub use timebase::{BeatCursor, Tick, Timebase, TransportState};
