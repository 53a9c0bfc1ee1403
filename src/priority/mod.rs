//! Numeric priority per subject: a mode-specific base score scaled by
//! confidence and cognitive capacity, then adjusted by tactical modifiers.

use std::collections::{BTreeMap, HashSet};
use serde::{Serialize, Deserialize};
use crate::diagnostics::Diagnostics;
use crate::logging;
use crate::subjects::model::{StrategicState, SubjectInCycle};

pub const MAX_DISCOVERY_BOOSTS_PER_CYCLE: usize = 2;
const DISCOVERY_BOOST: f64 = 1.5;
const ROI_PENALTY: f64 = 0.25;
const ROI_MAX_RELEVANCE: u32 = 3;
const ROI_MIN_HOURS: f64 = 20.0;
const STALLED_VELOCITY: f64 = 0.01;
const URGENCY_SHOCK_BONUS: f64 = 50.0;

/// Flags the reasoning stage reads back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningFlags {
    pub discovery_boost_applied: bool,
    pub roi_warning: bool,
    pub urgency_shock: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub base_priority: f64,
    pub confidence_modulator: f64,
    pub cognitive_multiplier: f64,
    pub discovery_multiplier: f64,
    pub roi_multiplier: f64,
    pub urgency_bonus: f64,
    pub recency_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub final_priority: f64,
    pub flags: ReasoningFlags,
    pub breakdown: PriorityBreakdown,
}

/// Relevance weights recorded for each subject in the previous cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviousCycleSnapshot {
    pub relevance_by_subject: BTreeMap<i64, u32>,
}

impl PreviousCycleSnapshot {
    pub fn from_subjects(subjects: &[SubjectInCycle]) -> Self {
        PreviousCycleSnapshot {
            relevance_by_subject: subjects.iter().map(|s| (s.id, s.relevance)).collect(),
        }
    }
}

pub fn confidence_modulator(confidence: f64) -> f64 {
    0.4 + 0.6 * confidence
}

/// Mode-specific score before cognitive scaling and modifiers
pub fn base_priority(mode: StrategicState, relevance: u32, diagnostics: &Diagnostics) -> f64 {
    let relevance = relevance as f64;
    let mastery = diagnostics.durable_mastery_score;
    let modulator = confidence_modulator(diagnostics.mastery_confidence_score);

    match mode {
        StrategicState::Discovery => 50.0 + 10.0 * relevance,
        StrategicState::DeepWork => (50.0 + 5.0 * relevance + 50.0 * (1.0 - mastery)) * modulator,
        StrategicState::Conquer => (90.0 + 20.0 * mastery + 2.0 * relevance) * modulator,
        StrategicState::Cement => {
            (40.0 + 40.0 * (1.0 - diagnostics.durability_factor) + 3.0 * relevance) * modulator
        }
        StrategicState::Maintain => (10.0 + 2.0 * relevance) * modulator,
    }
}

/// The DISCOVERY subjects eligible for the boost: earliest added first, then
/// highest relevance.
pub fn discovery_boost_set(discovery_subjects: &[SubjectInCycle]) -> HashSet<i64> {
    let mut candidates: Vec<&SubjectInCycle> = discovery_subjects.iter().collect();
    candidates.sort_by(|a, b| {
        a.date_added
            .cmp(&b.date_added)
            .then(b.relevance.cmp(&a.relevance))
            .then(a.id.cmp(&b.id))
    });
    candidates
        .into_iter()
        .take(MAX_DISCOVERY_BOOSTS_PER_CYCLE)
        .map(|s| s.id)
        .collect()
}

/// Scores subjects for one cycle.
#[derive(Debug, Clone)]
pub struct PriorityEngine {
    cognitive_multiplier: f64,
    boosted: HashSet<i64>,
    previous_cycle: Option<PreviousCycleSnapshot>,
}

impl PriorityEngine {
    pub fn new(
        cognitive_multiplier: f64,
        discovery_subjects: &[SubjectInCycle],
        previous_cycle: Option<PreviousCycleSnapshot>,
    ) -> Self {
        PriorityEngine {
            cognitive_multiplier,
            boosted: discovery_boost_set(discovery_subjects),
            previous_cycle,
        }
    }

    pub fn boosted_subjects(&self) -> &HashSet<i64> {
        &self.boosted
    }

    pub fn score(&self, subject: &SubjectInCycle, diagnostics: &Diagnostics) -> PriorityResult {
        let mode = diagnostics.strategic_mode;
        let base = base_priority(mode, subject.relevance, diagnostics);
        let mut priority = base * self.cognitive_multiplier;
        let mut flags = ReasoningFlags::default();
        let mut breakdown = PriorityBreakdown {
            base_priority: base,
            confidence_modulator: confidence_modulator(diagnostics.mastery_confidence_score),
            cognitive_multiplier: self.cognitive_multiplier,
            discovery_multiplier: 1.0,
            roi_multiplier: 1.0,
            urgency_bonus: 0.0,
            recency_multiplier: 1.0,
        };

        if mode == StrategicState::Discovery && self.boosted.contains(&subject.id) {
            priority *= DISCOVERY_BOOST;
            breakdown.discovery_multiplier = DISCOVERY_BOOST;
            flags.discovery_boost_applied = true;
            logging::log_modifier(subject.id, "discovery_boost", priority);
        }

        if mode == StrategicState::Conquer
            && subject.relevance <= ROI_MAX_RELEVANCE
            && diagnostics.total_time_invested_hr > ROI_MIN_HOURS
            && diagnostics.learning_velocity < STALLED_VELOCITY
        {
            priority *= ROI_PENALTY;
            breakdown.roi_multiplier = ROI_PENALTY;
            flags.roi_warning = true;
            logging::log_modifier(subject.id, "roi_penalty", priority);
        }

        if self.relevance_increased(subject) {
            priority += URGENCY_SHOCK_BONUS;
            breakdown.urgency_bonus = URGENCY_SHOCK_BONUS;
            flags.urgency_shock = true;
            logging::log_modifier(subject.id, "urgency_shock", priority);
        }

        let recency = recency_multiplier(subject, diagnostics);
        priority *= recency;
        breakdown.recency_multiplier = recency;

        PriorityResult { final_priority: priority, flags, breakdown }
    }

    fn relevance_increased(&self, subject: &SubjectInCycle) -> bool {
        self.previous_cycle
            .as_ref()
            .and_then(|snapshot| snapshot.relevance_by_subject.get(&subject.id))
            .map(|previous| *previous < subject.relevance)
            .unwrap_or(false)
    }
}

/// Hook for de-prioritizing subjects studied very recently. Always neutral
/// until sessions carry enough recency detail to drive it.
fn recency_multiplier(_subject: &SubjectInCycle, _diagnostics: &Diagnostics) -> f64 {
    1.0
}
