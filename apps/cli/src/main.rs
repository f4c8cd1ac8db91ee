mod console;
mod input;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pulse_domain::{interval_ms, AccentPattern, EngineConfig, TimeSignature};
use pulse_engine::{spawn, Command, Engine};
use pulse_input::TapTempo;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleSink;
use crate::input::{parse_line, parse_mode, Input};

#[derive(Parser, Debug)]
#[command(author, version, about = "Metronome with tap tempo, gap and tempo trainers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play a click and read commands from stdin
    Play(PlayArgs),
    /// Estimate a tempo from tap timestamps in milliseconds
    Tap {
        #[arg(required = true)]
        timestamps: Vec<f64>,
    },
    /// Print the time between beats
    Interval {
        #[arg(long, default_value_t = 120)]
        bpm: i64,
        #[arg(long, default_value = "4/4")]
        meter: TimeSignature,
    },
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// YAML or JSON engine config
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bpm: Option<i64>,
    /// Time signature such as 7/8
    #[arg(long)]
    meter: Option<TimeSignature>,
    /// Comma separated levels, 0 mute to 3 accent
    #[arg(long)]
    accents: Option<AccentPattern>,
    /// off, gap or tempo
    #[arg(long)]
    trainer: Option<String>,
    #[arg(long)]
    gap: Option<i64>,
    #[arg(long)]
    click: Option<i64>,
    #[arg(long)]
    jump: Option<i64>,
    /// Measures between tempo trainer jumps
    #[arg(long)]
    every: Option<i64>,
    /// Stop after this many beats
    #[arg(long)]
    beats: Option<u64>,
    /// Print beats as JSON lines
    #[arg(long)]
    json: bool,
}

impl PlayArgs {
    fn config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_path(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(bpm) = self.bpm {
            config.bpm = bpm;
        }
        if let Some(meter) = self.meter {
            config.signature = meter;
        }
        if let Some(accents) = &self.accents {
            config.accents = Some(accents.levels().to_vec());
        }
        if let Some(trainer) = &self.trainer {
            config.mode = parse_mode(trainer)?;
        }
        if let Some(gap) = self.gap {
            let click = i64::from(config.gap.click_beats);
            config.gap = pulse_domain::GapTrainerConfig::new(gap, click);
        }
        if let Some(click) = self.click {
            let gap = i64::from(config.gap.gap_beats);
            config.gap = pulse_domain::GapTrainerConfig::new(gap, click);
        }
        if let Some(jump) = self.jump {
            config.tempo_trainer = pulse_domain::TempoTrainerConfig::new(
                jump,
                i64::from(config.tempo_trainer.interval_measures),
            );
        }
        if let Some(every) = self.every {
            let jump = i64::from(config.tempo_trainer.jump_bpm);
            config.tempo_trainer = pulse_domain::TempoTrainerConfig::new(jump, every);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Mode::Play(args) => {
            let runtime = Runtime::new()?;
            runtime.block_on(play(args))
        }
        Mode::Tap { timestamps } => {
            let mut tapper = TapTempo::new();
            let estimate = timestamps.iter().fold(None, |_, &at| tapper.tap(at));
            match estimate {
                Some(bpm) => println!("{bpm}"),
                None => println!("need at least two taps within 2 s of each other"),
            }
            Ok(())
        }
        Mode::Interval { bpm, meter } => {
            let bpm = pulse_domain::limits::clamp_bpm(bpm);
            println!("{:.3} ms", interval_ms(bpm, meter.denominator()));
            Ok(())
        }
    }
}

async fn play(args: PlayArgs) -> Result<()> {
    let config = args.config()?;
    let done = Arc::new(Notify::new());
    let sink = ConsoleSink::new(args.json, args.beats, done.clone());
    let engine = Engine::new(&config, Box::new(sink));
    info!(
        bpm = engine.settings().bpm(),
        signature = %engine.settings().signature(),
        mode = ?engine.mode(),
        "starting"
    );

    let (handle, task) = spawn(engine);
    handle.send(Command::Start)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            _ = done.notified() => break,
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("read stdin")? else {
                    stdin_open = false;
                    continue;
                };
                match parse_line(&line) {
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Status)) => {
                        let snapshot = handle.snapshot().await?;
                        eprintln!("{}", serde_json::to_string_pretty(&snapshot)?);
                    }
                    Ok(Some(Input::Command(command))) => handle.send(command)?,
                    Ok(None) => {}
                    Err(err) => warn!("{err:#}"),
                }
            }
        }
    }

    handle.shutdown()?;
    let engine = task.await.context("engine task panicked")?;
    info!(bpm = engine.settings().bpm(), beats = engine.cursor().absolute, "stopped");
    Ok(())
}
