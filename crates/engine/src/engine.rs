use pulse_domain::{AccentLevel, EngineConfig, Settings, TimeSignature, TrainerMode};
use pulse_input::{
    AccentDrag, DeltaAccumulator, DialTuning, DragOutcome, EntryFeedback, EntryKey, IndexWheel,
    NumericEntry, TapTempo, WheelEvent, WheelTuning,
};
use pulse_trainer::{GapTrainer, TempoTrainer};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::command::Command;
use crate::setting::Setting;
use crate::sink::BeatSink;
use crate::timebase::{BeatCursor, Timebase, TransportState};

/// What was played for one beat.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct BeatEvent {
    pub position: u8,
    pub absolute: u64,
    /// Level sent to the renderer.
    pub level: AccentLevel,
    /// Level in the accent pattern, before any trainer muting.
    pub pattern_level: AccentLevel,
    /// Silenced by the gap trainer.
    pub muted: bool,
    pub is_accent: bool,
    pub measure_complete: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Snapshot {
    pub state: TransportState,
    pub settings: Settings,
    pub mode: TrainerMode,
    pub cursor: BeatCursor,
    pub tempo_baseline: Option<u16>,
    pub entry_display: Option<String>,
}

struct WheelSession {
    setting: Setting,
    wheel: IndexWheel,
}

struct EntrySession {
    setting: Setting,
    entry: NumericEntry,
}

/// Owns every piece of state and routes beats and input between the
/// components. All methods run on the engine's single task.
pub struct Engine {
    settings: Settings,
    mode: TrainerMode,
    timebase: Timebase,
    taps: TapTempo,
    dial: DeltaAccumulator,
    wheel_tuning: WheelTuning,
    wheel: Option<WheelSession>,
    entry: Option<EntrySession>,
    accent_drag: Option<AccentDrag>,
    gap: GapTrainer,
    tempo: TempoTrainer,
    sink: Box<dyn BeatSink>,
}

impl Engine {
    pub fn new(config: &EngineConfig, sink: Box<dyn BeatSink>) -> Self {
        let mut engine = Self {
            settings: config.settings(),
            mode: TrainerMode::Off,
            timebase: Timebase::new(config.warmup_ms as f64, config.rearm),
            taps: TapTempo::new(),
            dial: DeltaAccumulator::new(DialTuning::default()),
            wheel_tuning: WheelTuning::default(),
            wheel: None,
            entry: None,
            accent_drag: None,
            gap: GapTrainer::new(),
            tempo: TempoTrainer::new(),
            sink,
        };
        engine.set_mode(config.mode);
        engine
    }

    pub fn with_tuning(mut self, dial: DialTuning, wheel: WheelTuning) -> Self {
        self.dial = DeltaAccumulator::new(dial);
        self.wheel_tuning = wheel;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> TrainerMode {
        self.mode
    }

    pub fn state(&self) -> TransportState {
        self.timebase.state()
    }

    pub fn is_playing(&self) -> bool {
        self.timebase.is_playing()
    }

    pub fn cursor(&self) -> BeatCursor {
        self.timebase.cursor()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state(),
            settings: self.settings.clone(),
            mode: self.mode,
            cursor: self.cursor(),
            tempo_baseline: self.tempo.baseline(),
            entry_display: self
                .entry
                .as_ref()
                .map(|session| session.entry.display().to_string()),
        }
    }

    // transport

    #[instrument(skip(self))]
    pub fn start(&mut self, now_ms: f64) -> bool {
        if !self.timebase.start(now_ms) {
            return false;
        }
        self.gap.reset();
        if self.mode == TrainerMode::Tempo {
            self.tempo.activate(self.settings.bpm());
        }
        info!(
            bpm = self.settings.bpm(),
            signature = %self.settings.signature(),
            "engine started"
        );
        true
    }

    #[instrument(skip(self))]
    pub fn stop(&mut self) -> bool {
        let was_playing = self.timebase.stop();
        if was_playing && self.mode == TrainerMode::Tempo {
            if let Some(baseline) = self.tempo.restore() {
                self.settings.set_bpm(i64::from(baseline));
            }
        }
        if was_playing {
            info!(bpm = self.settings.bpm(), "engine stopped");
        }
        was_playing
    }

    pub fn toggle(&mut self, now_ms: f64) -> bool {
        if self.is_playing() {
            self.stop();
        } else {
            self.start(now_ms);
        }
        self.is_playing()
    }

    /// When the pending beat is due, in clock milliseconds.
    pub fn next_deadline(&self) -> Option<f64> {
        self.timebase.due_ms()
    }

    /// Plays the pending beat if it is due: resolves its level, tells the
    /// sink, then lets the trainers see the measure boundary.
    pub fn on_timer(&mut self, now_ms: f64) -> Option<BeatEvent> {
        let tick = self
            .timebase
            .fire(now_ms, self.settings.bpm(), self.settings.signature())?;

        let muted = self.mode == TrainerMode::Gap && self.gap.on_beat(&self.settings.gap());
        let pattern_level = self
            .settings
            .accents()
            .level(usize::from(tick.position) - 1);
        // the downbeat that opens a run is always accented
        let first = tick.absolute == 0;
        let level = match (muted, first) {
            (true, _) => AccentLevel::Mute,
            (false, true) => AccentLevel::Accent,
            (false, false) => pattern_level,
        };
        let is_accent = first || pattern_level == AccentLevel::Accent;

        self.sink.on_beat(level, is_accent);
        self.sink.on_beat_visual(is_accent);

        if tick.measure_complete {
            self.on_measure_complete();
        }

        let event = BeatEvent {
            position: tick.position,
            absolute: tick.absolute,
            level,
            pattern_level,
            muted,
            is_accent,
            measure_complete: tick.measure_complete,
        };
        self.sink.on_event(&event);
        Some(event)
    }

    fn on_measure_complete(&mut self) {
        match self.mode {
            TrainerMode::Gap => self.gap.on_measure_complete(),
            TrainerMode::Tempo => {
                let config = self.settings.tempo_trainer();
                if let Some(raised) = self.tempo.on_measure_complete(&config, self.settings.bpm()) {
                    self.settings.set_bpm(i64::from(raised));
                }
            }
            TrainerMode::Off => {}
        }
    }

    // settings

    /// Sets any numeric value, clamped. Returns the value now in effect.
    pub fn set(&mut self, setting: Setting, value: i64) -> i64 {
        match setting {
            Setting::Bpm => {
                self.settings.set_bpm(value);
            }
            Setting::Numerator => {
                if self.settings.set_numerator(value) {
                    self.timebase
                        .fit_measure(self.settings.signature().numerator());
                    debug!(
                        numerator = self.settings.signature().numerator(),
                        "accent pattern reset"
                    );
                }
            }
            Setting::Denominator => {
                self.settings.set_denominator(value);
            }
            Setting::GapBeats => {
                self.settings.set_gap_beats(value);
            }
            Setting::ClickBeats => {
                self.settings.set_click_beats(value);
            }
            Setting::JumpBpm => {
                self.settings.set_jump_bpm(value);
            }
            Setting::IntervalMeasures => {
                self.settings.set_interval_measures(value);
            }
        }
        setting.current(&self.settings)
    }

    pub fn set_bpm(&mut self, bpm: i64) -> u16 {
        self.settings.set_bpm(bpm)
    }

    pub fn nudge_bpm(&mut self, delta: i64) -> u16 {
        self.settings.nudge_bpm(delta)
    }

    pub fn set_signature(&mut self, signature: TimeSignature) {
        self.set(Setting::Denominator, i64::from(signature.denominator()));
        self.set(Setting::Numerator, i64::from(signature.numerator()));
    }

    pub fn set_accents(&mut self, levels: &[AccentLevel]) {
        self.settings.set_accents(levels);
    }

    pub fn cycle_accent(&mut self, index: usize) -> Option<AccentLevel> {
        self.settings.accents_mut().cycle_level(index)
    }

    /// Leaves the current trainer and enters `mode`. Choosing the active
    /// mode again starts that trainer over.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: TrainerMode) {
        match self.mode {
            TrainerMode::Tempo => {
                if let Some(baseline) = self.tempo.deactivate() {
                    self.settings.set_bpm(i64::from(baseline));
                }
            }
            TrainerMode::Gap => self.gap.reset(),
            TrainerMode::Off => {}
        }
        match mode {
            TrainerMode::Tempo => self.tempo.activate(self.settings.bpm()),
            TrainerMode::Gap => self.gap.reset(),
            TrainerMode::Off => {}
        }
        self.mode = mode;
    }

    // input

    /// Registers a tap and applies the estimate once there is one.
    pub fn tap(&mut self, now_ms: f64) -> Option<u16> {
        let bpm = self.taps.tap(now_ms)?;
        Some(self.settings.set_bpm(i64::from(bpm)))
    }

    /// Feeds one tempo dial sample; returns the tempo when it moved.
    pub fn rotate(&mut self, delta: f64, elapsed_ms: f64) -> Option<u16> {
        let settings = &mut self.settings;
        self.dial
            .feed_into(delta, elapsed_ms, |step| settings.nudge_bpm(step))
    }

    pub fn wheel_press(&mut self, setting: Setting, y: f64, now_ms: f64) {
        // only a wheel still in motion is caught; otherwise start from the
        // value in force now
        let reuse = matches!(
            &self.wheel,
            Some(session) if session.setting == setting && session.wheel.is_animating()
        );
        if !reuse {
            let selected = setting.index_of(setting.current(&self.settings));
            self.wheel = Some(WheelSession {
                setting,
                wheel: IndexWheel::new(setting.choices(), selected, self.wheel_tuning),
            });
        }
        if let Some(session) = self.wheel.as_mut() {
            session.wheel.begin_drag(y, now_ms);
        }
    }

    pub fn wheel_move(&mut self, y: f64, now_ms: f64) {
        let event = self
            .wheel
            .as_mut()
            .and_then(|session| session.wheel.drag_to(y, now_ms));
        if let Some(event) = event {
            self.handle_wheel_event(event);
        }
    }

    pub fn wheel_release(&mut self, now_ms: f64) {
        let event = self
            .wheel
            .as_mut()
            .and_then(|session| session.wheel.release(now_ms));
        if let Some(event) = event {
            self.handle_wheel_event(event);
        }
    }

    /// True while the wheel needs [`Engine::wheel_frame`] pumped.
    pub fn wheel_animating(&self) -> bool {
        self.wheel
            .as_ref()
            .is_some_and(|session| session.wheel.is_animating())
    }

    pub fn wheel_frame_ms(&self) -> f64 {
        self.wheel_tuning.frame_ms
    }

    pub fn wheel_frame(&mut self) {
        let events = match self.wheel.as_mut() {
            Some(session) => session.wheel.frame(),
            None => return,
        };
        for event in events {
            self.handle_wheel_event(event);
        }
    }

    fn handle_wheel_event(&mut self, event: WheelEvent) {
        match event {
            WheelEvent::Tick(index) => self.sink.on_wheel_tick(index),
            WheelEvent::Settled(index) => {
                if let Some(setting) = self.wheel.as_ref().map(|session| session.setting) {
                    let value = self.set(setting, setting.value_at(index));
                    debug!(?setting, value, "wheel settled");
                }
            }
        }
    }

    pub fn accent_press(&mut self, index: usize, y: f64) {
        self.accent_drag = Some(AccentDrag::begin(self.settings.accents(), index, y));
    }

    pub fn accent_move(&mut self, index: usize, y: f64) -> Option<AccentLevel> {
        let drag = self.accent_drag.as_mut()?;
        drag.update(self.settings.accents_mut(), index, y)
    }

    pub fn accent_release(&mut self) -> Option<DragOutcome> {
        let drag = self.accent_drag.take()?;
        drag.finish(self.settings.accents_mut())
    }

    pub fn entry_open(&mut self, setting: Setting) {
        let (min, max) = setting.bounds();
        let mut entry = NumericEntry::new(min, max);
        let current = setting.current(&self.settings).clamp(0, i64::from(u16::MAX)) as u16;
        entry.open(current);
        self.entry = Some(EntrySession { setting, entry });
    }

    pub fn entry_key(&mut self, key: EntryKey) -> EntryFeedback {
        let Some(session) = self.entry.as_mut() else {
            return EntryFeedback::Ignored;
        };
        let feedback = session.entry.press(key);
        if let EntryFeedback::Committed(value) = feedback {
            let setting = session.setting;
            self.entry = None;
            if let Some(value) = value {
                self.set(setting, i64::from(value));
            }
        }
        feedback
    }

    pub fn entry_cancel(&mut self) {
        if let Some(mut session) = self.entry.take() {
            session.entry.close(false);
        }
    }

    /// Applies a command from the run loop. `Shutdown` is handled by the
    /// loop itself.
    pub fn apply(&mut self, command: Command, now_ms: f64) {
        match command {
            Command::Start => {
                self.start(now_ms);
            }
            Command::Stop => {
                self.stop();
            }
            Command::Toggle => {
                self.toggle(now_ms);
            }
            Command::Set(setting, value) => {
                self.set(setting, value);
            }
            Command::NudgeBpm(delta) => {
                self.nudge_bpm(delta);
            }
            Command::SetSignature(signature) => self.set_signature(signature),
            Command::SetAccents(levels) => self.set_accents(&levels),
            Command::CycleAccent(index) => {
                self.cycle_accent(index);
            }
            Command::SetMode(mode) => self.set_mode(mode),
            Command::Tap => {
                self.tap(now_ms);
            }
            Command::Rotate { delta, elapsed_ms } => {
                self.rotate(delta, elapsed_ms);
            }
            Command::WheelPress { setting, y } => self.wheel_press(setting, y, now_ms),
            Command::WheelMove { y } => self.wheel_move(y, now_ms),
            Command::WheelRelease => self.wheel_release(now_ms),
            Command::AccentPress { index, y } => self.accent_press(index, y),
            Command::AccentMove { index, y } => {
                self.accent_move(index, y);
            }
            Command::AccentRelease => {
                self.accent_release();
            }
            Command::EntryOpen(setting) => self.entry_open(setting),
            Command::EntryKey(key) => {
                self.entry_key(key);
            }
            Command::EntryCancel => self.entry_cancel(),
            Command::Snapshot(reply) => {
                if reply.send(self.snapshot()).is_err() {
                    warn!("snapshot requester went away");
                }
            }
            Command::Shutdown => {
                self.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordingSink, SinkCall};

    fn engine_with(config: EngineConfig) -> (Engine, RecordingSink) {
        let sink = RecordingSink::new();
        let engine = Engine::new(&config, Box::new(sink.clone()));
        (engine, sink)
    }

    /// Starts at t=0 and plays `beats` beats, each exactly on time.
    fn play(engine: &mut Engine, beats: usize) -> Vec<BeatEvent> {
        if !engine.is_playing() {
            engine.start(0.0);
        }
        (0..beats)
            .map(|_| {
                let due = engine.next_deadline().unwrap();
                engine.on_timer(due).unwrap()
            })
            .collect()
    }

    #[test]
    fn beats_follow_the_accent_pattern() {
        let (mut engine, sink) = engine_with(EngineConfig::default());
        engine.set_accents(&[AccentLevel::Accent, AccentLevel::Ghost, AccentLevel::Mute]);
        let events = play(&mut engine, 5);
        let levels: Vec<_> = events.iter().map(|event| event.level).collect();
        assert_eq!(
            levels,
            vec![
                AccentLevel::Accent,
                AccentLevel::Ghost,
                AccentLevel::Mute,
                AccentLevel::Normal,
                AccentLevel::Accent,
            ]
        );
        assert!(events[3].measure_complete);
        assert_eq!(
            &sink.calls()[..2],
            &[
                SinkCall::Beat {
                    level: AccentLevel::Accent,
                    is_accent: true
                },
                SinkCall::Visual { is_accent: true },
            ]
        );
    }

    #[test]
    fn first_beat_after_start_is_accented() {
        let (mut engine, sink) = engine_with(EngineConfig::default());
        engine.set_accents(&[AccentLevel::Ghost, AccentLevel::Ghost, AccentLevel::Mute]);
        let events = play(&mut engine, 5);
        assert_eq!(events[0].level, AccentLevel::Accent);
        assert_eq!(events[0].pattern_level, AccentLevel::Ghost);
        assert!(events[0].is_accent);
        // the next measure follows the pattern again
        assert_eq!(events[4].level, AccentLevel::Ghost);
        assert!(!events[4].is_accent);
        assert_eq!(
            &sink.calls()[..3],
            &[
                SinkCall::Beat {
                    level: AccentLevel::Accent,
                    is_accent: true
                },
                SinkCall::Visual { is_accent: true },
                SinkCall::Event(events[0]),
            ]
        );
    }

    #[test]
    fn gap_mode_mutes_after_warm_up_but_keeps_visuals() {
        let config = EngineConfig {
            mode: TrainerMode::Gap,
            gap: pulse_domain::GapTrainerConfig::new(2, 2),
            ..EngineConfig::default()
        };
        let (mut engine, sink) = engine_with(config);
        let events = play(&mut engine, 12);
        let muted: Vec<bool> = events.iter().map(|event| event.muted).collect();
        assert_eq!(
            muted,
            vec![
                false, false, false, false, true, true, false, false, true, true, false, false
            ]
        );
        assert_eq!(events[4].level, AccentLevel::Mute);
        assert_eq!(events[4].pattern_level, AccentLevel::Accent);
        let visuals = sink
            .calls()
            .into_iter()
            .filter(|call| matches!(call, SinkCall::Visual { .. }))
            .count();
        assert_eq!(visuals, 12);
    }

    #[test]
    fn restart_repeats_the_gap_warm_up() {
        let config = EngineConfig {
            mode: TrainerMode::Gap,
            gap: pulse_domain::GapTrainerConfig::new(1, 1),
            ..EngineConfig::default()
        };
        let (mut engine, _) = engine_with(config);
        play(&mut engine, 6);
        engine.stop();
        let events = play(&mut engine, 5);
        assert!(events[..4].iter().all(|event| !event.muted));
        assert!(events[4].muted);
    }

    #[test]
    fn tempo_mode_raises_and_stop_restores() {
        let config = EngineConfig {
            bpm: 100,
            mode: TrainerMode::Tempo,
            tempo_trainer: pulse_domain::TempoTrainerConfig::new(5, 2),
            ..EngineConfig::default()
        };
        let (mut engine, _) = engine_with(config);
        play(&mut engine, 8);
        assert_eq!(engine.settings().bpm(), 105);
        play(&mut engine, 8);
        assert_eq!(engine.settings().bpm(), 110);
        assert!(engine.stop());
        assert_eq!(engine.settings().bpm(), 100);
    }

    #[test]
    fn idle_stop_keeps_manual_tempo() {
        let config = EngineConfig {
            mode: TrainerMode::Tempo,
            ..EngineConfig::default()
        };
        let (mut engine, _) = engine_with(config);
        engine.set(Setting::Bpm, 150);
        assert!(!engine.stop());
        assert_eq!(engine.settings().bpm(), 150);

        engine.start(0.0);
        engine.set(Setting::Bpm, 170);
        assert!(engine.stop());
        assert_eq!(engine.settings().bpm(), 150);
    }

    #[test]
    fn leaving_tempo_mode_restores_baseline() {
        let config = EngineConfig {
            bpm: 90,
            mode: TrainerMode::Tempo,
            tempo_trainer: pulse_domain::TempoTrainerConfig::new(10, 1),
            ..EngineConfig::default()
        };
        let (mut engine, _) = engine_with(config);
        play(&mut engine, 4);
        assert_eq!(engine.settings().bpm(), 100);
        engine.set_mode(TrainerMode::Off);
        assert_eq!(engine.settings().bpm(), 90);
        play(&mut engine, 4);
        assert_eq!(engine.settings().bpm(), 90);
    }

    #[test]
    fn numerator_edit_resets_pattern_and_cursor() {
        let (mut engine, _) = engine_with(EngineConfig::default());
        engine.cycle_accent(1);
        play(&mut engine, 3);
        assert_eq!(engine.cursor().position, 4);
        assert_eq!(engine.set(Setting::Numerator, 2), 2);
        assert_eq!(engine.settings().accents().len(), 2);
        assert_eq!(engine.cursor().position, 1);
        assert_eq!(engine.set(Setting::Numerator, 99), 16);
        assert_eq!(engine.settings().accents().len(), 16);
    }

    #[test]
    fn toggle_does_not_double_start() {
        let (mut engine, _) = engine_with(EngineConfig::default());
        assert!(engine.toggle(0.0));
        assert!(!engine.start(10.0));
        assert_eq!(engine.next_deadline(), Some(50.0));
        assert!(!engine.toggle(20.0));
        assert_eq!(engine.next_deadline(), None);
        assert!(!engine.stop());
    }

    #[test]
    fn taps_and_dial_move_the_tempo() {
        let (mut engine, _) = engine_with(EngineConfig::default());
        assert_eq!(engine.tap(1_000.0), None);
        assert_eq!(engine.tap(1_600.0), Some(100));
        assert_eq!(engine.rotate(17.5, 0.0), None);
        assert_eq!(engine.rotate(17.5, 0.0), Some(101));
        assert_eq!(engine.rotate(-70.0, 0.0), Some(99));
    }

    #[test]
    fn custom_dial_tuning() {
        let (engine, _) = engine_with(EngineConfig::default());
        let tuning = DialTuning {
            sensitivity: 10.0,
            ..DialTuning::default()
        };
        let mut engine = engine.with_tuning(tuning, WheelTuning::default());
        assert_eq!(engine.rotate(10.0, 0.0), Some(121));
    }

    #[test]
    fn wheel_settle_applies_the_value() {
        let (mut engine, sink) = engine_with(EngineConfig::default());
        engine.wheel_press(Setting::Numerator, 0.0, 0.0);
        // numerator 4 is entry 3; two items further is 6
        engine.wheel_move(-80.0, 1_000.0);
        engine.wheel_release(1_000.0);
        assert!(!engine.wheel_animating());
        assert_eq!(engine.settings().signature().numerator(), 6);
        assert!(sink.calls().contains(&SinkCall::WheelTick(5)));
    }

    #[test]
    fn wheel_press_starts_from_the_current_value() {
        let (mut engine, _) = engine_with(EngineConfig::default());
        engine.wheel_press(Setting::Bpm, 0.0, 0.0);
        engine.wheel_move(-40.0, 16.0);
        engine.wheel_release(16.0);
        for _ in 0..1_000 {
            if !engine.wheel_animating() {
                break;
            }
            engine.wheel_frame();
        }
        assert!(engine.settings().bpm() > 121);

        engine.set(Setting::Bpm, 90);
        engine.wheel_press(Setting::Bpm, 0.0, 2_000.0);
        engine.wheel_release(2_000.0);
        assert!(!engine.wheel_animating());
        assert_eq!(engine.settings().bpm(), 90);
    }

    #[test]
    fn wheel_animation_is_pumped_by_frames() {
        let (mut engine, _) = engine_with(EngineConfig::default());
        engine.wheel_press(Setting::Denominator, 0.0, 0.0);
        engine.wheel_move(-50.0, 1_000.0);
        engine.wheel_release(1_000.0);
        assert!(engine.wheel_animating());
        for _ in 0..20 {
            engine.wheel_frame();
        }
        assert!(!engine.wheel_animating());
        assert_eq!(engine.settings().signature().denominator(), 8);
    }

    #[test]
    fn accent_drag_through_the_engine() {
        let (mut engine, _) = engine_with(EngineConfig::default());
        engine.accent_press(2, 100.0);
        assert_eq!(engine.accent_move(2, 20.0), Some(AccentLevel::Accent));
        assert!(matches!(
            engine.accent_release(),
            Some(DragOutcome::Dragged { index: 2, .. })
        ));
        engine.accent_press(3, 100.0);
        assert!(matches!(
            engine.accent_release(),
            Some(DragOutcome::Tapped {
                index: 3,
                level: AccentLevel::Accent
            })
        ));
    }

    #[test]
    fn keypad_entry_commits_clamped_values() {
        let (mut engine, _) = engine_with(EngineConfig::default());
        engine.entry_open(Setting::GapBeats);
        assert_eq!(engine.snapshot().entry_display.as_deref(), Some("4"));
        engine.entry_key(EntryKey::Digit(1));
        engine.entry_key(EntryKey::Digit(2));
        assert_eq!(
            engine.entry_key(EntryKey::Confirm),
            EntryFeedback::Committed(Some(12))
        );
        assert_eq!(engine.settings().gap().gap_beats, 12);
        assert_eq!(engine.entry_key(EntryKey::Digit(3)), EntryFeedback::Ignored);

        engine.entry_open(Setting::Bpm);
        engine.entry_key(EntryKey::Digit(9));
        engine.entry_cancel();
        assert_eq!(engine.settings().bpm(), 120);
    }

    #[test]
    fn commands_route_to_operations() {
        let (mut engine, _) = engine_with(EngineConfig::default());
        engine.apply(Command::Set(Setting::Bpm, 1_000), 0.0);
        assert_eq!(engine.settings().bpm(), 360);
        engine.apply(Command::NudgeBpm(-60), 0.0);
        engine.apply(Command::SetSignature(TimeSignature::new(7, 8)), 0.0);
        engine.apply(Command::SetMode(TrainerMode::Gap), 0.0);
        engine.apply(Command::Start, 0.0);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.settings.bpm(), 300);
        assert_eq!(snapshot.settings.signature().to_string(), "7/8");
        assert_eq!(snapshot.settings.accents().len(), 7);
        assert_eq!(snapshot.mode, TrainerMode::Gap);
        assert_eq!(snapshot.state, TransportState::Starting);
    }
}
