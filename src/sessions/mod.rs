use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use crate::error::StudyError;

/// One answered question inside a study session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub topic: String,
    pub is_correct: bool,
}

/// Immutable historical study session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudySession {
    pub id: i64,
    pub subject_id: i64,
    /// Start time as stored; malformed values are tolerated and skipped by diagnostics
    pub started_at: String,
    /// Duration with pauses excluded
    pub liquid_duration_secs: u64,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

impl StudySession {
    /// Start time, if the stored timestamp parses
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        parse_session_time(&self.started_at)
    }

    /// Calendar date the session started on
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_time().map(|t| t.date())
    }

    pub fn hours(&self) -> f64 {
        self.liquid_duration_secs as f64 / 3600.0
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and bare dates (midnight).
pub fn parse_session_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Sessions belonging to one subject, in their original order
pub fn sessions_for_subject(sessions: &[StudySession], subject_id: i64) -> Vec<StudySession> {
    sessions
        .iter()
        .filter(|s| s.subject_id == subject_id)
        .cloned()
        .collect()
}

/// Hours logged across the `n` most recent sessions with a readable start date
pub fn recent_hours(sessions: &[StudySession], n: usize) -> f64 {
    let mut dated: Vec<(NaiveDateTime, &StudySession)> = sessions
        .iter()
        .filter_map(|s| s.start_time().map(|t| (t, s)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.iter().take(n).map(|(_, s)| s.hours()).sum()
}

pub fn sessions_dir(root: &Path) -> PathBuf {
    root.join("sessions")
}

/// Save a session record asynchronously
pub async fn save_session(root: &Path, record: &StudySession) -> Result<(), StudyError> {
    let dir = sessions_dir(root);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| StudyError::new(
            format!("Failed to create sessions directory: {}", e),
            "io"
        ).with_context(format!("path: {:?}", dir)))?;

    let fname = dir.join(format!("{}.json", record.id));
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| StudyError::new(
            format!("Failed to serialize session record: {}", e),
            "json_serialize"
        ))?;

    tokio::fs::write(&fname, json)
        .await
        .map_err(|e| StudyError::new(
            format!("Failed to write session file: {}", e),
            "io"
        ).with_context(format!("path: {:?}", fname)))?;

    Ok(())
}

/// Load all session records asynchronously
pub async fn load_all_sessions(root: &Path) -> Result<Vec<StudySession>, StudyError> {
    let mut records = Vec::new();
    let dir = sessions_dir(root);

    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Directory doesn't exist yet, return empty vec
            return Ok(records);
        }
        Err(e) => {
            return Err(StudyError::new(
                format!("Failed to read sessions directory: {}", e),
                "io"
            ).with_context(format!("path: {:?}", dir)));
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                match serde_json::from_str::<StudySession>(&text) {
                    Ok(rec) => records.push(rec),
                    Err(e) => {
                        tracing::warn!(
                            path = ?path,
                            error = %e,
                            "Failed to parse session file"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = ?path,
                    error = %e,
                    "Failed to read session file"
                );
            }
        }
    }

    // Unparseable dates sort first; ties fall back to id for a stable order
    records.sort_by(|a, b| a.start_time().cmp(&b.start_time()).then(a.id.cmp(&b.id)));
    Ok(records)
}
