use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use std::fmt;
use crate::subjects::weights::{final_weight, num_blocks};

/// High-level goal assigned to a subject for a cycle.
/// Declaration order is the progression order used for regression checks.
/// Stored labels the planner does not know read as `Discovery`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum StrategicState {
    #[default]
    Discovery,
    DeepWork,
    Conquer,
    Cement,
    Maintain,
}

impl StrategicState {
    pub const ALL: [StrategicState; 5] = [
        StrategicState::Discovery,
        StrategicState::DeepWork,
        StrategicState::Conquer,
        StrategicState::Cement,
        StrategicState::Maintain,
    ];

    /// Lenient parse for labels coming from storage; unknown labels fall back to Discovery
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().replace(' ', "_").as_str() {
            "DEEP_WORK" => StrategicState::DeepWork,
            "CONQUER" => StrategicState::Conquer,
            "CEMENT" => StrategicState::Cement,
            "MAINTAIN" => StrategicState::Maintain,
            _ => StrategicState::Discovery,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategicState::Discovery => "DISCOVERY",
            StrategicState::DeepWork => "DEEP_WORK",
            StrategicState::Conquer => "CONQUER",
            StrategicState::Cement => "CEMENT",
            StrategicState::Maintain => "MAINTAIN",
        }
    }

    /// True when moving from `previous` to `self` goes backwards in the progression
    pub fn is_regression_from(&self, previous: StrategicState) -> bool {
        *self < previous
    }
}

impl From<String> for StrategicState {
    fn from(label: String) -> Self {
        StrategicState::from_label(&label)
    }
}

impl From<StrategicState> for String {
    fn from(state: StrategicState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for StrategicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-subject memory that damps strategic mode changes between cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HysteresisRecord {
    pub consecutive_cycles_in_state: u32,
    pub last_transition_date: Option<NaiveDate>,
    pub last_mastery_score: f64,
}

impl HysteresisRecord {
    /// A record that has never been through a planning run
    pub fn is_pristine(&self) -> bool {
        self.consecutive_cycles_in_state == 0 && self.last_transition_date.is_none()
    }
}

fn default_active() -> bool {
    true
}

/// A subject's configuration within one planning cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectInCycle {
    pub id: i64,
    pub cycle_id: i64,
    pub name: String,
    pub relevance: u32,
    pub volume: u32,
    pub difficulty: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub strategic_state: StrategicState,
    #[serde(default)]
    pub hysteresis: HysteresisRecord,
    pub date_added: NaiveDate,
    #[serde(default)]
    pub final_weight: f64,
    #[serde(default)]
    pub num_blocks: u32,
}

impl SubjectInCycle {
    pub fn new<S: Into<String>>(
        id: i64,
        cycle_id: i64,
        name: S,
        relevance: u32,
        volume: u32,
        difficulty: u32,
        date_added: NaiveDate,
    ) -> Self {
        let weight = final_weight(relevance, volume, difficulty);
        SubjectInCycle {
            id,
            cycle_id,
            name: name.into(),
            relevance,
            volume,
            difficulty,
            is_active: true,
            strategic_state: StrategicState::Discovery,
            hysteresis: HysteresisRecord::default(),
            date_added,
            final_weight: weight,
            num_blocks: num_blocks(weight),
        }
    }

    /// Replace the raw weights and recompute the derived ones
    pub fn set_weights(&mut self, relevance: u32, volume: u32, difficulty: u32) {
        self.relevance = relevance;
        self.volume = volume;
        self.difficulty = difficulty;
        self.recompute_weight();
    }

    pub fn recompute_weight(&mut self) {
        self.final_weight = final_weight(self.relevance, self.volume, self.difficulty);
        self.num_blocks = num_blocks(self.final_weight);
    }
}

/// A discrete, estimated-duration task within a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkUnit {
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    #[serde(default)]
    pub unit_type: String,
    pub estimated_minutes: u32,
    /// Tag used to look up topic accuracy
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub sequence_order: i32,
}
