//! The engine's single task. It owns the [`Engine`] and is the only place
//! that waits: for the next beat, for the next wheel frame, or for a
//! command.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::command::Command;
use crate::engine::{Engine, Snapshot};

/// Milliseconds since a fixed epoch, the time base shared by the engine and
/// the loop.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1_000.0
    }

    pub fn instant_at(&self, ms: f64) -> Instant {
        self.epoch + Duration::from_secs_f64(ms.max(0.0) / 1_000.0)
    }
}

/// Cheap, cloneable way to talk to a running engine.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl EngineHandle {
    pub fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("engine task has stopped"))
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply))?;
        response.await.context("engine dropped snapshot request")
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }
}

pub fn channel() -> (EngineHandle, mpsc::UnboundedReceiver<Command>) {
    let (commands, receiver) = mpsc::unbounded_channel();
    (EngineHandle { commands }, receiver)
}

/// Drives `engine` until `Shutdown` arrives or every handle is dropped, then
/// stops it and hands it back.
pub async fn run(
    mut engine: Engine,
    mut commands: mpsc::UnboundedReceiver<Command>,
    clock: Clock,
) -> Engine {
    let frame = Duration::from_secs_f64(engine.wheel_frame_ms().max(1.0) / 1_000.0);
    let mut next_frame: Option<Instant> = None;
    info!("engine loop running");

    loop {
        if !engine.wheel_animating() {
            next_frame = None;
        } else if next_frame.is_none() {
            next_frame = Some(Instant::now() + frame);
        }
        let beat_at = engine.next_deadline().map(|ms| clock.instant_at(ms));

        tokio::select! {
            biased;

            _ = sleep_until(beat_at.unwrap_or_else(Instant::now)), if beat_at.is_some() => {
                engine.on_timer(clock.now_ms());
            }
            _ = sleep_until(next_frame.unwrap_or_else(Instant::now)), if next_frame.is_some() => {
                next_frame = None;
                engine.wheel_frame();
            }
            command = commands.recv() => match command {
                Some(Command::Shutdown) | None => break,
                Some(command) => {
                    debug!(?command, "engine command");
                    engine.apply(command, clock.now_ms());
                }
            },
        }
    }

    engine.stop();
    info!("engine loop finished");
    engine
}

/// Spawns [`run`] on the current runtime.
pub fn spawn(engine: Engine) -> (EngineHandle, tokio::task::JoinHandle<Engine>) {
    let (handle, commands) = channel();
    let task = tokio::spawn(run(engine, commands, Clock::start()));
    (handle, task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setting::Setting;
    use crate::sink::RecordingSink;
    use crate::timebase::TransportState;
    use pulse_domain::{AccentLevel, EngineConfig, TrainerMode};

    fn engine(config: EngineConfig) -> (Engine, RecordingSink) {
        let sink = RecordingSink::new();
        (Engine::new(&config, Box::new(sink.clone())), sink)
    }

    #[tokio::test(start_paused = true)]
    async fn plays_beats_on_schedule() {
        let (engine, sink) = engine(EngineConfig::default());
        let (handle, task) = spawn(engine);
        handle.send(Command::Start).unwrap();
        // warm-up of 50 ms, then 500 ms per beat at 120 bpm
        tokio::time::sleep(Duration::from_millis(1_600)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, TransportState::Running);
        assert_eq!(snapshot.cursor.absolute, 4);
        assert_eq!(
            sink.beat_levels(),
            vec![
                AccentLevel::Accent,
                AccentLevel::Normal,
                AccentLevel::Normal,
                AccentLevel::Normal,
            ]
        );
        handle.shutdown().unwrap();
        let engine = task.await.unwrap();
        assert!(!engine.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn tempo_change_waits_for_the_pending_beat() {
        let (engine, sink) = engine(EngineConfig::default());
        let (handle, task) = spawn(engine);
        handle.send(Command::Start).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sink.beat_levels().len(), 1);
        handle.send(Command::Set(Setting::Bpm, 60)).unwrap();
        // beat two is still due at 550 ms, beat three a full second later
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sink.beat_levels().len(), 2);
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(sink.beat_levels().len(), 2);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(sink.beat_levels().len(), 3);
        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_restores_trainer_baseline() {
        let config = EngineConfig {
            bpm: 100,
            mode: TrainerMode::Tempo,
            tempo_trainer: pulse_domain::TempoTrainerConfig::new(5, 1),
            ..EngineConfig::default()
        };
        let (engine, _) = engine(config);
        let (handle, task) = spawn(engine);
        handle.send(Command::Start).unwrap();
        // one 4/4 measure at 100 bpm is 2.4 s
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(handle.snapshot().await.unwrap().settings.bpm(), 105);
        handle.send(Command::Stop).unwrap();
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, TransportState::Idle);
        assert_eq!(snapshot.settings.bpm(), 100);
        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn wheel_momentum_runs_between_commands() {
        let (engine, sink) = engine(EngineConfig::default());
        let (handle, task) = spawn(engine);
        handle
            .send(Command::WheelPress {
                setting: Setting::Bpm,
                y: 0.0,
            })
            .unwrap();
        tokio::time::sleep(Duration::from_millis(16)).await;
        handle.send(Command::WheelMove { y: -30.0 }).unwrap();
        tokio::time::sleep(Duration::from_millis(16)).await;
        handle.send(Command::WheelMove { y: -60.0 }).unwrap();
        handle.send(Command::WheelRelease).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        let bpm = handle.snapshot().await.unwrap().settings.bpm();
        assert!(bpm > 122, "momentum should carry the wheel on, got {bpm}");
        assert!(!sink.calls().is_empty());
        handle.shutdown().unwrap();
        task.await.unwrap();
    }
}
