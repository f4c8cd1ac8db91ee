use anyhow::{anyhow, bail, Context, Result};
use pulse_domain::{AccentPattern, TimeSignature, TrainerMode};
use pulse_engine::{Command, Setting};

/// One line typed on stdin while the engine plays.
#[derive(Debug)]
pub enum Input {
    Command(Command),
    Status,
    Quit,
}

pub fn parse_mode(text: &str) -> Result<TrainerMode> {
    match text {
        "off" | "none" => Ok(TrainerMode::Off),
        "gap" => Ok(TrainerMode::Gap),
        "tempo" => Ok(TrainerMode::Tempo),
        other => bail!("unknown trainer mode {other:?}"),
    }
}

pub fn parse_line(line: &str) -> Result<Option<Input>> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let number = |arg: Option<&str>| -> Result<i64> {
        let arg = arg.ok_or_else(|| anyhow!("{word} needs a number"))?;
        arg.parse()
            .with_context(|| format!("{arg:?} is not a number"))
    };
    let command = match word {
        "q" | "quit" | "exit" => return Ok(Some(Input::Quit)),
        "status" | "s" => return Ok(Some(Input::Status)),
        "t" | "tap" => Command::Tap,
        "+" => Command::NudgeBpm(number(arg).unwrap_or(1)),
        "-" => Command::NudgeBpm(number(arg).unwrap_or(1).saturating_neg()),
        "start" => Command::Start,
        "stop" => Command::Stop,
        "toggle" | "p" => Command::Toggle,
        "bpm" => Command::Set(Setting::Bpm, number(arg)?),
        "gap" => Command::Set(Setting::GapBeats, number(arg)?),
        "click" => Command::Set(Setting::ClickBeats, number(arg)?),
        "jump" => Command::Set(Setting::JumpBpm, number(arg)?),
        "every" => Command::Set(Setting::IntervalMeasures, number(arg)?),
        "meter" => {
            let signature: TimeSignature = arg.unwrap_or_default().parse()?;
            Command::SetSignature(signature)
        }
        "accent" => {
            let beat = number(arg)?;
            if beat < 1 {
                bail!("beats are numbered from 1");
            }
            Command::CycleAccent((beat - 1) as usize)
        }
        "accents" => {
            let pattern: AccentPattern = arg.unwrap_or_default().parse()?;
            Command::SetAccents(pattern.levels().to_vec())
        }
        "mode" => Command::SetMode(parse_mode(arg.unwrap_or_default())?),
        other => bail!("unknown command {other:?}"),
    };
    Ok(Some(Input::Command(command)))
}
