//! Importance weight of a subject from its configured attributes.
//!
//! `final_weight = 0.5·relevance + 0.2·volume + 0.3·difficulty`, computed in
//! tenths so small integer inputs produce the exact decimal result.

const RELEVANCE_TENTHS: u64 = 5;
const VOLUME_TENTHS: u64 = 2;
const DIFFICULTY_TENTHS: u64 = 3;

pub fn final_weight(relevance: u32, volume: u32, difficulty: u32) -> f64 {
    let tenths = RELEVANCE_TENTHS * relevance as u64
        + VOLUME_TENTHS * volume as u64
        + DIFFICULTY_TENTHS * difficulty as u64;
    tenths as f64 / 10.0
}

/// Study blocks for a weight, rounding halves up
pub fn num_blocks(final_weight: f64) -> u32 {
    if final_weight <= 0.0 {
        return 0;
    }
    (final_weight + 0.5).floor() as u32
}
