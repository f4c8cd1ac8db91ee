use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::limits::{clamp_denominator, clamp_numerator};
use crate::DomainError;

/// Milliseconds between two beats of `bpm` written as `1/denominator` notes.
/// The tempo is counted in quarter notes, so eighths run twice as fast.
pub fn interval_ms(bpm: u16, denominator: u8) -> f64 {
    let bpm = f64::from(bpm.max(1));
    let denominator = f64::from(denominator.max(1));
    (60_000.0 / bpm) * (4.0 / denominator)
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawSignature")]
pub struct TimeSignature {
    /// Beats per measure.
    numerator: u8,
    /// Note value of one beat.
    denominator: u8,
}

impl TimeSignature {
    pub const COMMON: TimeSignature = TimeSignature {
        numerator: 4,
        denominator: 4,
    };

    /// Builds a signature, clamping both parts into their domains.
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator: clamp_numerator(numerator),
            denominator: clamp_denominator(denominator),
        }
    }

    pub fn numerator(&self) -> u8 {
        self.numerator
    }

    pub fn denominator(&self) -> u8 {
        self.denominator
    }

    pub fn with_numerator(self, numerator: i64) -> Self {
        Self {
            numerator: clamp_numerator(numerator),
            ..self
        }
    }

    pub fn with_denominator(self, denominator: i64) -> Self {
        Self {
            denominator: clamp_denominator(denominator),
            ..self
        }
    }

    pub fn beat_interval_ms(&self, bpm: u16) -> f64 {
        interval_ms(bpm, self.denominator)
    }

    pub fn measure_ms(&self, bpm: u16) -> f64 {
        self.beat_interval_ms(bpm) * f64::from(self.numerator)
    }
}

/// Unchecked wire form; deserializing always goes through the clamps.
#[derive(Deserialize)]
struct RawSignature {
    numerator: i64,
    denominator: i64,
}

impl From<RawSignature> for TimeSignature {
    fn from(raw: RawSignature) -> Self {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for TimeSignature {
    type Err = DomainError;

    /// Parses `"7/8"`. Numbers outside the domains are clamped, malformed
    /// text is rejected.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (top, bottom) = text
            .trim()
            .split_once('/')
            .ok_or_else(|| DomainError::validation(format!("expected N/D, got {text:?}")))?;
        let top: i64 = top
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("bad numerator in {text:?}")))?;
        let bottom: i64 = bottom
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("bad denominator in {text:?}")))?;
        Ok(Self::new(top, bottom))
    }
}
