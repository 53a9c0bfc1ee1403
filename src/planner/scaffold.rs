//! Strategic view: how the cycle's time is split between subjects, with the
//! recommended plan and up to two alternatives.

use serde::{Serialize, Deserialize};
use crate::planner::allocation::proportional_split;
use crate::planner::RankedSubject;
use crate::subjects::model::StrategicState;

pub const MAINTAIN_BLOCK_MINUTES: u32 = 30;
const DEEP_WORK_SHARE: f64 = 0.7;
const DEEP_WORK_MAX_FOCUS: usize = 2;
const REVIEW_DURABILITY: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSession {
    pub subject_id: i64,
    pub subject_name: String,
    pub strategic_mode: StrategicState,
    pub allocated_minutes: u32,
    pub priority: f64,
}

impl PlanSession {
    pub fn for_subject(subject: &RankedSubject, allocated_minutes: u32) -> Self {
        PlanSession {
            subject_id: subject.subject_id,
            subject_name: subject.name.clone(),
            strategic_mode: subject.diagnostics.strategic_mode,
            allocated_minutes,
            priority: subject.priority.final_priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldPlan {
    pub name: String,
    pub description: String,
    pub sessions: Vec<PlanSession>,
    pub total_minutes: u32,
}

impl ScaffoldPlan {
    /// Sessions end up sorted by allocated minutes, longest first
    pub fn new<S: Into<String>, D: Into<String>>(name: S, description: D, mut sessions: Vec<PlanSession>) -> Self {
        sessions.sort_by(|a, b| b.allocated_minutes.cmp(&a.allocated_minutes));
        let total_minutes = sessions.iter().map(|s| s.allocated_minutes).sum();
        ScaffoldPlan {
            name: name.into(),
            description: description.into(),
            sessions,
            total_minutes,
        }
    }

    pub fn minutes_for(&self, subject_id: i64) -> Option<u32> {
        self.sessions
            .iter()
            .find(|s| s.subject_id == subject_id)
            .map(|s| s.allocated_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanScaffold {
    pub recommended_plan: ScaffoldPlan,
    pub alternative_plans: Vec<ScaffoldPlan>,
}

fn maintain_sessions(maintain: &[&RankedSubject]) -> Vec<PlanSession> {
    maintain
        .iter()
        .map(|s| PlanSession::for_subject(s, MAINTAIN_BLOCK_MINUTES))
        .collect()
}

pub fn balanced_plan(
    processed: &[&RankedSubject],
    minutes: &[u32],
    maintain: &[&RankedSubject],
) -> ScaffoldPlan {
    let mut sessions: Vec<PlanSession> = processed
        .iter()
        .zip(minutes)
        .map(|(s, m)| PlanSession::for_subject(s, *m))
        .collect();
    sessions.extend(maintain_sessions(maintain));
    ScaffoldPlan::new(
        "Balanced",
        "Time split across all subjects according to their priority.",
        sessions,
    )
}

/// Top one or two DEEP_WORK/CONQUER subjects share 70% of the time; the rest
/// share what is left. `processed` must be ordered by priority, highest first.
pub fn deep_work_plan(
    processed: &[&RankedSubject],
    maintain: &[&RankedSubject],
    available_minutes: u32,
) -> Option<ScaffoldPlan> {
    let focus: Vec<&RankedSubject> = processed
        .iter()
        .copied()
        .filter(|s| {
            matches!(
                s.diagnostics.strategic_mode,
                StrategicState::DeepWork | StrategicState::Conquer
            )
        })
        .take(DEEP_WORK_MAX_FOCUS)
        .collect();
    if focus.is_empty() {
        return None;
    }

    let rest: Vec<&RankedSubject> = processed
        .iter()
        .copied()
        .filter(|s| !focus.iter().any(|f| f.subject_id == s.subject_id))
        .collect();

    let focus_minutes = available_minutes as f64 * DEEP_WORK_SHARE;
    let rest_minutes = available_minutes as f64 - focus_minutes;

    let focus_weights: Vec<f64> = focus.iter().map(|s| s.priority.final_priority).collect();
    let rest_weights: Vec<f64> = rest.iter().map(|s| s.priority.final_priority).collect();

    let mut sessions: Vec<PlanSession> = focus
        .iter()
        .zip(proportional_split(&focus_weights, focus_minutes))
        .map(|(s, m)| PlanSession::for_subject(s, m))
        .collect();
    sessions.extend(
        rest.iter()
            .zip(proportional_split(&rest_weights, rest_minutes))
            .map(|(s, m)| PlanSession::for_subject(s, m)),
    );
    sessions.extend(maintain_sessions(maintain));

    let names: Vec<&str> = focus.iter().map(|s| s.name.as_str()).collect();
    Some(ScaffoldPlan::new(
        "Deep Work",
        format!("Concentrate most of the cycle on {}.", names.join(" and ")),
        sessions,
    ))
}

fn needs_review(subject: &RankedSubject) -> bool {
    subject.diagnostics.strategic_mode == StrategicState::Cement
        || subject.diagnostics.durability_factor < REVIEW_DURABILITY
}

/// Subjects that need consolidation keep their balanced allocation; everything
/// else is halved. Maintenance blocks are untouched.
pub fn review_plan(
    processed: &[&RankedSubject],
    minutes: &[u32],
    maintain: &[&RankedSubject],
) -> Option<ScaffoldPlan> {
    if !processed.iter().any(|s| needs_review(s)) {
        return None;
    }

    let mut sessions: Vec<PlanSession> = processed
        .iter()
        .zip(minutes)
        .map(|(s, m)| {
            let minutes = if needs_review(s) { *m } else { *m / 2 };
            PlanSession::for_subject(s, minutes)
        })
        .collect();
    sessions.extend(maintain_sessions(maintain));

    Some(ScaffoldPlan::new(
        "Review & Reinforce",
        "Favour consolidation of subjects whose knowledge is fading.",
        sessions,
    ))
}
