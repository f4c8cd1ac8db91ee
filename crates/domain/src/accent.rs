use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Loudness tier of a single beat.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccentLevel {
    Mute = 0,
    Ghost = 1,
    Normal = 2,
    Accent = 3,
}

impl AccentLevel {
    pub const ALL: [AccentLevel; 4] = [
        AccentLevel::Mute,
        AccentLevel::Ghost,
        AccentLevel::Normal,
        AccentLevel::Accent,
    ];

    /// Level for any integer, clamped to `0..=3`.
    pub fn from_clamped(value: i64) -> Self {
        Self::ALL[value.clamp(0, 3) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Next level in the tap cycle, wrapping accent back to mute.
    pub fn cycled(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    pub fn is_audible(self) -> bool {
        self != AccentLevel::Mute
    }
}

impl TryFrom<u8> for AccentLevel {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| DomainError::validation(format!("accent level {value} not in 0..=3")))
    }
}

impl fmt::Display for AccentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccentLevel::Mute => "mute",
            AccentLevel::Ghost => "ghost",
            AccentLevel::Normal => "normal",
            AccentLevel::Accent => "accent",
        };
        f.write_str(name)
    }
}

/// One level per beat of the measure. The length always matches the
/// numerator it was built for.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccentPattern {
    levels: Vec<AccentLevel>,
}

impl AccentPattern {
    /// Accent on the downbeat, normal everywhere else.
    pub fn default_for(beats: u8) -> Self {
        let beats = usize::from(beats.max(1));
        let mut levels = vec![AccentLevel::Normal; beats];
        levels[0] = AccentLevel::Accent;
        Self { levels }
    }

    /// Uses `levels` for the first beats, then pads with normal or
    /// truncates so the pattern covers exactly `beats` positions.
    pub fn fitted(levels: &[AccentLevel], beats: u8) -> Self {
        let beats = usize::from(beats.max(1));
        let mut fitted: Vec<AccentLevel> = levels.iter().copied().take(beats).collect();
        fitted.resize(beats, AccentLevel::Normal);
        Self { levels: fitted }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[AccentLevel] {
        &self.levels
    }

    /// Level at zero-based `index`, or normal when the index is outside the
    /// pattern.
    pub fn level(&self, index: usize) -> AccentLevel {
        self.levels
            .get(index)
            .copied()
            .unwrap_or(AccentLevel::Normal)
    }

    /// Out-of-range indices are ignored.
    pub fn set_level(&mut self, index: usize, level: AccentLevel) {
        if let Some(slot) = self.levels.get_mut(index) {
            *slot = level;
        }
    }

    /// Advances one position through mute, ghost, normal, accent and
    /// returns the new level.
    pub fn cycle_level(&mut self, index: usize) -> Option<AccentLevel> {
        let slot = self.levels.get_mut(index)?;
        *slot = slot.cycled();
        Some(*slot)
    }
}

impl Default for AccentPattern {
    fn default() -> Self {
        Self::default_for(4)
    }
}

impl FromStr for AccentPattern {
    type Err = DomainError;

    /// Parses a comma separated list of levels such as `3,2,1,0`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let levels = text
            .split(',')
            .map(|part| {
                let value: u8 = part.trim().parse().map_err(|_| {
                    DomainError::validation(format!("bad accent level {:?}", part.trim()))
                })?;
                AccentLevel::try_from(value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        if levels.is_empty() {
            return Err(DomainError::validation("accent pattern is empty"));
        }
        Ok(Self { levels })
    }
}
