//! Domains of every numeric setting and the clamp functions that keep values
//! inside them. All of them are total: any integer maps to a valid value.

pub const MIN_BPM: u16 = 1;
pub const MAX_BPM: u16 = 360;
pub const DEFAULT_BPM: u16 = 120;

pub const MIN_NUMERATOR: u8 = 1;
pub const MAX_NUMERATOR: u8 = 16;

/// Note values a beat may be written as, smallest exponent first.
pub const DENOMINATORS: [u8; 6] = [1, 2, 4, 8, 16, 32];

pub const MIN_CYCLE_BEATS: u16 = 1;
pub const MAX_CYCLE_BEATS: u16 = 999;

pub const MIN_JUMP_BPM: u16 = 1;
pub const MAX_JUMP_BPM: u16 = 99;

pub const MIN_INTERVAL_MEASURES: u16 = 1;
pub const MAX_INTERVAL_MEASURES: u16 = 999;

fn clamp_range(value: i64, min: u16, max: u16) -> u16 {
    value.clamp(i64::from(min), i64::from(max)) as u16
}

pub fn clamp_bpm(value: i64) -> u16 {
    clamp_range(value, MIN_BPM, MAX_BPM)
}

pub fn clamp_numerator(value: i64) -> u8 {
    value.clamp(i64::from(MIN_NUMERATOR), i64::from(MAX_NUMERATOR)) as u8
}

/// Maps any integer onto the nearest allowed note value, measured in octaves
/// (log2), so `3 -> 4`, `6 -> 8` and `24 -> 32`.
pub fn clamp_denominator(value: i64) -> u8 {
    if value <= 1 {
        return DENOMINATORS[0];
    }
    let exponent = (value as f64).log2().round() as usize;
    DENOMINATORS[exponent.min(DENOMINATORS.len() - 1)]
}

/// Gap or click length of the gap trainer cycle.
pub fn clamp_cycle_beats(value: i64) -> u16 {
    clamp_range(value, MIN_CYCLE_BEATS, MAX_CYCLE_BEATS)
}

pub fn clamp_jump_bpm(value: i64) -> u16 {
    clamp_range(value, MIN_JUMP_BPM, MAX_JUMP_BPM)
}

pub fn clamp_interval_measures(value: i64) -> u16 {
    clamp_range(value, MIN_INTERVAL_MEASURES, MAX_INTERVAL_MEASURES)
}
