pub mod hysteresis;

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::logging;
use crate::sessions::{recent_hours, StudySession};
use crate::subjects::model::{HysteresisRecord, StrategicState, SubjectInCycle};
use hysteresis::{gate, next_record, propose_mode, GateDecision, GateReason, RECENT_PROGRESS_SESSIONS};

pub const DECAY_RATE: f64 = 0.1;
/// Question count at which volume confidence saturates
pub const TARGET_QUESTIONS: u32 = 200;
/// Time-per-question instrumentation does not exist yet
const GRANULARITY_CONFIDENCE: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessMetrics {
    pub sessions: u32,
    /// Unweighted share of correct answers
    pub raw_accuracy: f64,
    pub questions_per_hour: f64,
    pub avg_session_minutes: f64,
}

/// Per-subject diagnosis, recomputed every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub durable_mastery_score: f64,
    pub durability_factor: f64,
    pub learning_velocity: f64,
    pub mastery_confidence_score: f64,
    pub total_time_invested_hr: f64,
    pub total_questions: u32,
    pub mastery_by_topic: BTreeMap<String, f64>,
    pub effectiveness_metrics: EffectivenessMetrics,
    pub strategic_mode: StrategicState,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics {
            durable_mastery_score: 0.0,
            durability_factor: 0.0,
            learning_velocity: 0.0,
            mastery_confidence_score: 0.0,
            total_time_invested_hr: 0.0,
            total_questions: 0,
            mastery_by_topic: BTreeMap::new(),
            effectiveness_metrics: EffectivenessMetrics::default(),
            strategic_mode: StrategicState::Discovery,
        }
    }
}

impl Diagnostics {
    /// Topic with the lowest accuracy, ties resolved alphabetically
    pub fn weakest_topic(&self) -> Option<(&str, f64)> {
        self.mastery_by_topic
            .iter()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(topic, acc)| (topic.as_str(), *acc))
    }
}

/// Result of diagnosing one subject: metrics, the gate verdict, and the
/// hysteresis record to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub diagnostics: Diagnostics,
    pub gate: GateDecision,
    pub hysteresis: HysteresisRecord,
}

pub fn recency_weight(days_ago: i64) -> f64 {
    (-DECAY_RATE * days_ago.max(0) as f64).exp()
}

pub fn volume_confidence(total_questions: u32) -> f64 {
    let raw = ((total_questions + 1) as f64).log10() / ((TARGET_QUESTIONS + 1) as f64).log10();
    raw.min(1.0)
}

/// Metrics for a non-empty history, with the proposed (ungated) mode.
pub fn compute_metrics(history: &[StudySession], today: NaiveDate) -> Diagnostics {
    let total_secs: u64 = history.iter().map(|s| s.liquid_duration_secs).sum();
    let total_time_invested_hr = total_secs as f64 / 3600.0;

    let mut weighted_correct = 0.0;
    let mut weight_sum = 0.0;
    let mut session_weights = Vec::with_capacity(history.len());
    let mut topic_counts: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    let mut total_questions = 0u32;
    let mut correct_questions = 0u32;

    for session in history {
        for q in &session.questions {
            let entry = topic_counts.entry(q.topic.clone()).or_insert((0, 0));
            entry.1 += 1;
            total_questions += 1;
            if q.is_correct {
                entry.0 += 1;
                correct_questions += 1;
            }
        }

        let Some(date) = session.start_date() else {
            tracing::warn!(
                session_id = session.id,
                started_at = %session.started_at,
                "Skipping session with unparseable start date"
            );
            continue;
        };
        let weight = recency_weight((today - date).num_days());
        session_weights.push(weight);
        for q in &session.questions {
            weight_sum += weight;
            if q.is_correct {
                weighted_correct += weight;
            }
        }
    }

    let durable_mastery_score = if weight_sum > 0.0 { weighted_correct / weight_sum } else { 0.0 };
    let durability_factor = if session_weights.is_empty() {
        0.0
    } else {
        session_weights.iter().sum::<f64>() / session_weights.len() as f64
    };

    let mastery_by_topic = topic_counts
        .into_iter()
        .map(|(topic, (correct, total))| {
            let accuracy = if total > 0 { correct as f64 / total as f64 } else { 0.0 };
            (topic, accuracy)
        })
        .collect();

    let learning_velocity = if total_time_invested_hr > 0.0 {
        durable_mastery_score / total_time_invested_hr
    } else {
        0.0
    };

    let mastery_confidence_score =
        (volume_confidence(total_questions) + durability_factor + GRANULARITY_CONFIDENCE) / 3.0;

    let effectiveness_metrics = EffectivenessMetrics {
        sessions: history.len() as u32,
        raw_accuracy: if total_questions > 0 {
            correct_questions as f64 / total_questions as f64
        } else {
            0.0
        },
        questions_per_hour: if total_time_invested_hr > 0.0 {
            total_questions as f64 / total_time_invested_hr
        } else {
            0.0
        },
        avg_session_minutes: if history.is_empty() {
            0.0
        } else {
            total_secs as f64 / 60.0 / history.len() as f64
        },
    };

    Diagnostics {
        durable_mastery_score,
        durability_factor,
        learning_velocity,
        mastery_confidence_score,
        total_time_invested_hr,
        total_questions,
        mastery_by_topic,
        effectiveness_metrics,
        strategic_mode: propose_mode(total_time_invested_hr, durable_mastery_score, durability_factor),
    }
}

/// Diagnoses one subject against its own session history.
#[derive(Debug, Clone, Copy)]
pub struct Diagnoser {
    today: NaiveDate,
}

impl Diagnoser {
    pub fn new(today: NaiveDate) -> Self {
        Diagnoser { today }
    }

    /// `history` must already be restricted to this subject's sessions.
    pub fn run(&self, subject: &SubjectInCycle, history: &[StudySession]) -> Diagnosis {
        let previous = subject.strategic_state;

        if history.is_empty() {
            let diagnostics = Diagnostics::default();
            let decision = GateDecision {
                previous,
                proposed: StrategicState::Discovery,
                resolved: StrategicState::Discovery,
                reason: GateReason::NoHistory,
            };
            let hysteresis = next_record(
                &subject.hysteresis,
                previous,
                StrategicState::Discovery,
                0.0,
                self.today,
            );
            return Diagnosis { diagnostics, gate: decision, hysteresis };
        }

        let mut diagnostics = compute_metrics(history, self.today);
        let proposed = diagnostics.strategic_mode;
        let decision = gate(
            previous,
            &subject.hysteresis,
            proposed,
            diagnostics.durable_mastery_score,
            recent_hours(history, RECENT_PROGRESS_SESSIONS),
        );

        if decision.vetoed() {
            logging::log_regression_veto(subject.id, previous, proposed);
        } else if decision.resolved != previous {
            logging::log_transition(subject.id, previous, decision.resolved);
        }

        diagnostics.strategic_mode = decision.resolved;
        let hysteresis = next_record(
            &subject.hysteresis,
            previous,
            decision.resolved,
            diagnostics.durable_mastery_score,
            self.today,
        );

        tracing::debug!(
            subject_id = subject.id,
            mastery = diagnostics.durable_mastery_score,
            durability = diagnostics.durability_factor,
            confidence = diagnostics.mastery_confidence_score,
            mode = %diagnostics.strategic_mode,
            "Subject diagnosed"
        );

        Diagnosis { diagnostics, gate: decision, hysteresis }
    }
}
