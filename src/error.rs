use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

/// Unified error type for the planner.
/// The pure pipeline stages never fail; this covers configuration and the
/// collaborators around them (files, sinks, run serialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyError {
    pub message: String,
    pub stage: String,
    pub subject_id: Option<i64>,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl StudyError {
    /// Create a new error with stage and message
    pub fn new<S: Into<String>>(message: S, stage: &'static str) -> Self {
        StudyError {
            message: message.into(),
            stage: stage.to_string(),
            subject_id: None,
            context: None,
            source: None,
        }
    }

    /// Attach the subject being processed when the error happened
    pub fn with_subject(mut self, subject_id: i64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    /// Add additional context information
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add source error information
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for StudyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(subject_id) = self.subject_id {
            write!(f, " (subject: {})", subject_id)?;
        }
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StudyError {}

/// Invalid cycle bundles. These are the only hard failures of a planning run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BundleError {
    #[error("subject {0} appears more than once in the cycle")]
    DuplicateSubject(i64),
    #[error("subject {subject_id} belongs to cycle {found}, expected cycle {expected}")]
    ForeignSubject { subject_id: i64, expected: i64, found: i64 },
    #[error("work unit {unit_id} references unknown subject {subject_id}")]
    OrphanWorkUnit { unit_id: i64, subject_id: i64 },
    #[error("available time must be positive")]
    NoAvailableTime,
}

impl From<BundleError> for StudyError {
    fn from(err: BundleError) -> Self {
        let subject = match &err {
            BundleError::DuplicateSubject(id) => Some(*id),
            BundleError::ForeignSubject { subject_id, .. } => Some(*subject_id),
            BundleError::OrphanWorkUnit { subject_id, .. } => Some(*subject_id),
            BundleError::NoAvailableTime => None,
        };
        let error = StudyError::new(err.to_string(), "validation").with_source("bundle");
        match subject {
            Some(id) => error.with_subject(id),
            None => error,
        }
    }
}

impl From<anyhow::Error> for StudyError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate form keeps the whole context chain
        StudyError::new(
            format!("{:#}", err),
            "startup"
        ).with_source("anyhow")
    }
}

impl From<std::io::Error> for StudyError {
    fn from(err: std::io::Error) -> Self {
        StudyError::new(
            format!("I/O error: {}", err),
            "io"
        ).with_source("std::io")
    }
}

impl From<serde_json::Error> for StudyError {
    fn from(err: serde_json::Error) -> Self {
        StudyError::new(
            format!("JSON error: {}", err),
            "json_parse"
        ).with_source("serde_json")
    }
}

impl From<toml::de::Error> for StudyError {
    fn from(err: toml::de::Error) -> Self {
        StudyError::new(
            format!("TOML error: {}", err),
            "config"
        ).with_source("toml")
    }
}
