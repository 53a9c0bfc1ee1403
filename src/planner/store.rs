use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::error::StudyError;
use crate::planner::Plan;

/// A persisted plan together with the fingerprint of the inputs it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPlan {
    pub fingerprint: String,
    pub plan: Plan,
}

pub fn get_plan_path(root: &Path) -> PathBuf {
    root.join("plan.json")
}

/// Save plan asynchronously
pub async fn save(root: &Path, stored: &StoredPlan) -> Result<(), StudyError> {
    let path = get_plan_path(root);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StudyError::new(
                format!("Failed to create directory: {}", e),
                "io"
            ).with_context(format!("path: {:?}", parent)))?;
    }

    let json = serde_json::to_string_pretty(stored)
        .map_err(|e| StudyError::new(
            format!("Failed to serialize plan: {}", e),
            "json_serialize"
        ))?;

    tokio::fs::write(&path, json)
        .await
        .map_err(|e| StudyError::new(
            format!("Failed to write plan.json: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path)))?;

    Ok(())
}

/// Load plan asynchronously
pub async fn load(root: &Path) -> Result<Option<StoredPlan>, StudyError> {
    let path = get_plan_path(root);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            serde_json::from_str(&content)
                .map_err(|e| StudyError::new(
                    format!("Failed to parse plan.json: {}", e),
                    "json_parse"
                ).with_context(format!("path: {:?}", path)))
                .map(Some)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(None)
        }
        Err(e) => {
            Err(StudyError::new(
                format!("Failed to read plan.json: {}", e),
                "io"
            ).with_context(format!("path: {:?}", path)))
        }
    }
}
