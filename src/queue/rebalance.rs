//! Difficulty adjustments proposed from a subject's aggregate accuracy.
//!
//! Rules are evaluated in order and the first one that fires wins.

use serde::{Serialize, Deserialize};
use crate::sessions::StudySession;
use crate::subjects::model::SubjectInCycle;

pub const MIN_QUESTIONS_FOR_REBALANCE: u32 = 20;
const LOW_ACCURACY: f64 = 0.75;
const HIGH_ACCURACY: f64 = 0.92;
const MIN_DIFFICULTY: u32 = 1;
const MAX_DIFFICULTY: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub total_questions: u32,
    pub correct: u32,
}

impl AccuracyStats {
    pub fn from_sessions(subject_id: i64, sessions: &[StudySession]) -> Self {
        sessions
            .iter()
            .filter(|s| s.subject_id == subject_id)
            .flat_map(|s| s.questions.iter())
            .fold(AccuracyStats::default(), |mut acc, q| {
                acc.total_questions += 1;
                if q.is_correct {
                    acc.correct += 1;
                }
                acc
            })
    }

    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total_questions as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceSuggestion {
    pub subject_id: i64,
    pub current_difficulty: u32,
    pub new_difficulty: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebalanceRule {
    /// Struggling: treat the subject as harder so it gets more blocks
    LowAccuracy,
    /// Cruising: treat the subject as easier
    HighAccuracy,
}

pub const DEFAULT_RULES: [RebalanceRule; 2] = [RebalanceRule::LowAccuracy, RebalanceRule::HighAccuracy];

impl RebalanceRule {
    pub fn evaluate(&self, subject: &SubjectInCycle, stats: &AccuracyStats) -> Option<RebalanceSuggestion> {
        if stats.total_questions < MIN_QUESTIONS_FOR_REBALANCE {
            return None;
        }
        let accuracy = stats.accuracy();
        let (new_difficulty, label) = match self {
            RebalanceRule::LowAccuracy if accuracy < LOW_ACCURACY => {
                ((subject.difficulty + 1).min(MAX_DIFFICULTY), "Low Accuracy")
            }
            RebalanceRule::HighAccuracy if accuracy > HIGH_ACCURACY => {
                (subject.difficulty.saturating_sub(1).max(MIN_DIFFICULTY), "High Accuracy")
            }
            _ => return None,
        };
        if new_difficulty == subject.difficulty {
            return None;
        }
        Some(RebalanceSuggestion {
            subject_id: subject.id,
            current_difficulty: subject.difficulty,
            new_difficulty,
            reason: format!(
                "{}: {:.1}% over {} questions",
                label,
                accuracy * 100.0,
                stats.total_questions
            ),
        })
    }
}

/// At most one suggestion per active subject
pub fn suggest_rebalance(subjects: &[SubjectInCycle], sessions: &[StudySession]) -> Vec<RebalanceSuggestion> {
    suggest_with_rules(subjects, sessions, &DEFAULT_RULES)
}

pub fn suggest_with_rules(
    subjects: &[SubjectInCycle],
    sessions: &[StudySession],
    rules: &[RebalanceRule],
) -> Vec<RebalanceSuggestion> {
    subjects
        .iter()
        .filter(|s| s.is_active)
        .filter_map(|subject| {
            let stats = AccuracyStats::from_sessions(subject.id, sessions);
            rules.iter().find_map(|rule| rule.evaluate(subject, &stats))
        })
        .collect()
}

/// Write suggested difficulties and recompute derived weights
pub fn apply_rebalance(subjects: &mut [SubjectInCycle], suggestions: &[RebalanceSuggestion]) {
    for suggestion in suggestions {
        if let Some(subject) = subjects.iter_mut().find(|s| s.id == suggestion.subject_id) {
            let (relevance, volume) = (subject.relevance, subject.volume);
            subject.set_weights(relevance, volume, suggestion.new_difficulty);
            tracing::info!(
                subject_id = subject.id,
                difficulty = suggestion.new_difficulty,
                reason = %suggestion.reason,
                "Rebalance applied"
            );
        }
    }
}
