//! Minutes per subject under the three allocation strategies.

use serde::{Serialize, Deserialize};

pub const ADAPTIVE_MIN_MINUTES: u32 = 40;
pub const ADAPTIVE_MAX_MINUTES: u32 = 110;
const ADAPTIVE_STEP: f64 = 10.0;

const BASIC_LOW_MINUTES: u32 = 45;
const BASIC_MID_MINUTES: u32 = 60;
const BASIC_HIGH_MINUTES: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum AllocationStrategy {
    /// Same configured block for everyone
    Fixed,
    /// Three priority tiers
    Basic,
    /// Proportional to priority
    #[default]
    Adaptive,
}

impl AllocationStrategy {
    /// Unknown labels fall back to Adaptive
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "fixed" => AllocationStrategy::Fixed,
            "basic" => AllocationStrategy::Basic,
            _ => AllocationStrategy::Adaptive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStrategy::Fixed => "fixed",
            AllocationStrategy::Basic => "basic",
            AllocationStrategy::Adaptive => "adaptive",
        }
    }
}

impl From<String> for AllocationStrategy {
    fn from(label: String) -> Self {
        AllocationStrategy::from_label(&label)
    }
}

impl From<AllocationStrategy> for String {
    fn from(strategy: AllocationStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

pub fn fixed_minutes(count: usize, block_minutes: u32) -> Vec<u32> {
    vec![block_minutes; count]
}

/// Bottom third of the priority range gets 45 minutes, middle 60, top 90.
pub fn basic_minutes(priorities: &[f64]) -> Vec<u32> {
    let min = priorities.iter().copied().fold(f64::INFINITY, f64::min);
    let max = priorities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    priorities
        .iter()
        .map(|p| {
            if range <= 0.0 {
                return BASIC_MID_MINUTES;
            }
            let position = (p - min) / range;
            if position < 1.0 / 3.0 {
                BASIC_LOW_MINUTES
            } else if position < 2.0 / 3.0 {
                BASIC_MID_MINUTES
            } else {
                BASIC_HIGH_MINUTES
            }
        })
        .collect()
}

/// Share of the available time proportional to priority, rounded to the
/// nearest 10 minutes and clamped to [40, 110].
pub fn adaptive_minutes(priorities: &[f64], available_minutes: u32) -> Vec<u32> {
    let total: f64 = priorities.iter().sum();
    if total <= 0.0 {
        return vec![ADAPTIVE_MIN_MINUTES; priorities.len()];
    }

    priorities
        .iter()
        .map(|p| {
            let raw = p / total * available_minutes as f64;
            let rounded = ((raw / ADAPTIVE_STEP).round() * ADAPTIVE_STEP) as u32;
            rounded.clamp(ADAPTIVE_MIN_MINUTES, ADAPTIVE_MAX_MINUTES)
        })
        .collect()
}

pub fn allocate(
    strategy: AllocationStrategy,
    priorities: &[f64],
    available_minutes: u32,
    block_minutes: u32,
) -> Vec<u32> {
    match strategy {
        AllocationStrategy::Fixed => fixed_minutes(priorities.len(), block_minutes),
        AllocationStrategy::Basic => basic_minutes(priorities),
        AllocationStrategy::Adaptive => adaptive_minutes(priorities, available_minutes),
    }
}

/// Split `minutes` across weights proportionally; equal shares when all weights are zero.
pub fn proportional_split(weights: &[f64], minutes: f64) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let total: f64 = weights.iter().sum();
    weights
        .iter()
        .map(|w| {
            let share = if total > 0.0 { w / total } else { 1.0 / weights.len() as f64 };
            (share * minutes).round() as u32
        })
        .collect()
}
