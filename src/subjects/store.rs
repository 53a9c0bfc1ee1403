use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::error::StudyError;
use crate::planner::allocation::AllocationStrategy;
use crate::priority::PreviousCycleSnapshot;
use crate::subjects::model::{SubjectInCycle, WorkUnit};
use crate::tutor::SubjectStateUpdate;

/// Everything stored about one planning cycle. `None` fields fall back to the
/// planner config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle_id: i64,
    pub subjects: Vec<SubjectInCycle>,
    #[serde(default)]
    pub work_units: Vec<WorkUnit>,
    #[serde(default)]
    pub available_minutes: Option<u32>,
    #[serde(default)]
    pub cycle_duration_days: Option<u32>,
    #[serde(default)]
    pub strategy: Option<AllocationStrategy>,
    #[serde(default)]
    pub block_duration_minutes: Option<u32>,
    #[serde(default)]
    pub previous_cycle: Option<PreviousCycleSnapshot>,
}

impl CycleRecord {
    pub fn new(cycle_id: i64, subjects: Vec<SubjectInCycle>) -> Self {
        CycleRecord {
            cycle_id,
            subjects,
            work_units: Vec::new(),
            available_minutes: None,
            cycle_duration_days: None,
            strategy: None,
            block_duration_minutes: None,
            previous_cycle: None,
        }
    }
}

pub fn cycle_path(root: &Path) -> PathBuf {
    root.join("cycle.json")
}

/// Write the resolved strategic state and hysteresis record back onto each subject
pub fn apply_state_updates(cycle: &mut CycleRecord, updates: &[SubjectStateUpdate]) {
    for update in updates {
        if let Some(subject) = cycle.subjects.iter_mut().find(|s| s.id == update.subject_id) {
            subject.strategic_state = update.strategic_state;
            subject.hysteresis = update.hysteresis.clone();
        } else {
            tracing::warn!(subject_id = update.subject_id, "State update for unknown subject");
        }
    }
}

/// Load the cycle asynchronously. Unlike the plan, a missing cycle is an error.
pub async fn load_cycle(root: &Path) -> Result<CycleRecord, StudyError> {
    let path = cycle_path(root);
    let data = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| StudyError::new(
            format!("Failed to read cycle.json: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path)))?;

    let mut cycle: CycleRecord = serde_json::from_str(&data)
        .map_err(|e| StudyError::new(
            format!("Failed to parse cycle.json: {}", e),
            "json_parse"
        ).with_context(format!("path: {:?}", path)))?;

    // Derived weights are never trusted from disk
    for subject in &mut cycle.subjects {
        subject.recompute_weight();
    }
    Ok(cycle)
}

/// Save the cycle asynchronously
pub async fn save_cycle(root: &Path, cycle: &CycleRecord) -> Result<(), StudyError> {
    let path = cycle_path(root);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StudyError::new(
                format!("Failed to create directory: {}", e),
                "io"
            ).with_context(format!("path: {:?}", parent)))?;
    }

    let json = serde_json::to_string_pretty(cycle)
        .map_err(|e| StudyError::new(
            format!("Failed to serialize cycle: {}", e),
            "json_serialize"
        ))?;

    tokio::fs::write(&path, json)
        .await
        .map_err(|e| StudyError::new(
            format!("Failed to write cycle.json: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path)))?;

    Ok(())
}
