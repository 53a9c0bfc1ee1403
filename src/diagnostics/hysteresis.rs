//! Strategic-mode state machine: propose a mode from current metrics, then
//! gate regressions so a subject does not bounce between modes cycle to cycle.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::subjects::model::{HysteresisRecord, StrategicState};

pub const MASTERY_TARGET: f64 = 0.90;
pub const CONQUER_THRESHOLD: f64 = 0.80;
const DISCOVERY_MAX_HOURS: f64 = 1.0;
const DISCOVERY_MAX_MASTERY: f64 = 0.1;
const MAINTAIN_MIN_DURABILITY: f64 = 0.7;

pub const MIN_CYCLES_IN_STATE_FOR_REGRESSION: u32 = 3;
/// Relative drop against the last recorded mastery
pub const MASTERY_DROP_THRESHOLD: f64 = 0.20;
pub const RECENT_PROGRESS_HOURS: f64 = 2.0;
pub const RECENT_PROGRESS_SESSIONS: usize = 3;

/// Step A: mode implied by the metrics alone
pub fn propose_mode(time_invested_hr: f64, mastery: f64, durability: f64) -> StrategicState {
    if time_invested_hr < DISCOVERY_MAX_HOURS && mastery < DISCOVERY_MAX_MASTERY {
        StrategicState::Discovery
    } else if mastery >= MASTERY_TARGET && durability > MAINTAIN_MIN_DURABILITY {
        StrategicState::Maintain
    } else if mastery >= MASTERY_TARGET {
        StrategicState::Cement
    } else if mastery >= CONQUER_THRESHOLD {
        StrategicState::Conquer
    } else {
        StrategicState::DeepWork
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    Unchanged,
    /// No sessions at all; the subject restarts in discovery
    NoHistory,
    Progression,
    RecentProgress,
    DwellTimeElapsed,
    MasteryDrop,
    Vetoed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    pub previous: StrategicState,
    pub proposed: StrategicState,
    pub resolved: StrategicState,
    pub reason: GateReason,
}

impl GateDecision {
    pub fn vetoed(&self) -> bool {
        self.reason == GateReason::Vetoed
    }
}

fn mastery_dropped(last_mastery: f64, current_mastery: f64) -> bool {
    if last_mastery <= 0.0 {
        return false;
    }
    (last_mastery - current_mastery) / last_mastery > MASTERY_DROP_THRESHOLD
}

/// Step B: accept or veto the proposed mode.
///
/// Forward moves always pass. A regression passes only with significant recent
/// study, enough cycles spent in the current mode, or a real mastery drop.
pub fn gate(
    previous: StrategicState,
    record: &HysteresisRecord,
    proposed: StrategicState,
    current_mastery: f64,
    recent_hours: f64,
) -> GateDecision {
    let decide = |resolved, reason| GateDecision { previous, proposed, resolved, reason };

    if proposed == previous {
        return decide(proposed, GateReason::Unchanged);
    }
    if recent_hours >= RECENT_PROGRESS_HOURS {
        return decide(proposed, GateReason::RecentProgress);
    }
    if !proposed.is_regression_from(previous) {
        return decide(proposed, GateReason::Progression);
    }
    if record.consecutive_cycles_in_state >= MIN_CYCLES_IN_STATE_FOR_REGRESSION {
        return decide(proposed, GateReason::DwellTimeElapsed);
    }
    if mastery_dropped(record.last_mastery_score, current_mastery) {
        return decide(proposed, GateReason::MasteryDrop);
    }
    decide(previous, GateReason::Vetoed)
}

/// Record to persist after the gate resolved. The input record is left untouched.
pub fn next_record(
    record: &HysteresisRecord,
    previous: StrategicState,
    resolved: StrategicState,
    current_mastery: f64,
    today: NaiveDate,
) -> HysteresisRecord {
    if resolved == previous {
        HysteresisRecord {
            consecutive_cycles_in_state: record.consecutive_cycles_in_state + 1,
            last_transition_date: record.last_transition_date,
            last_mastery_score: current_mastery,
        }
    } else {
        HysteresisRecord {
            consecutive_cycles_in_state: 1,
            last_transition_date: Some(today),
            last_mastery_score: current_mastery,
        }
    }
}
