//! Daily self-reported energy and stress, smoothed into one cognitive-capacity
//! multiplier for the whole cycle.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use crate::error::StudyError;

const TODAY_WEIGHT: f64 = 0.6;
const HISTORY_WEIGHT: f64 = 0.4;

/// Self-reported level. Labels the planner does not know read as `Unknown`
/// and weigh like `Normal`. Stored labels are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FactorLevel {
    High,
    #[default]
    Normal,
    Low,
    Unknown,
}

impl FactorLevel {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => FactorLevel::High,
            "normal" => FactorLevel::Normal,
            "low" => FactorLevel::Low,
            _ => FactorLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorLevel::High => "High",
            FactorLevel::Normal => "Normal",
            FactorLevel::Low => "Low",
            FactorLevel::Unknown => "Unknown",
        }
    }

    pub fn energy_multiplier(&self) -> f64 {
        match self {
            FactorLevel::High => 1.2,
            FactorLevel::Low => 0.8,
            FactorLevel::Normal | FactorLevel::Unknown => 1.0,
        }
    }

    pub fn stress_multiplier(&self) -> f64 {
        match self {
            FactorLevel::High => 0.8,
            FactorLevel::Low => 1.1,
            FactorLevel::Normal | FactorLevel::Unknown => 1.0,
        }
    }
}

impl From<String> for FactorLevel {
    fn from(label: String) -> Self {
        FactorLevel::from_label(&label)
    }
}

impl From<FactorLevel> for String {
    fn from(level: FactorLevel) -> Self {
        level.as_str().to_string()
    }
}

/// One self-report per user per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanFactorEntry {
    pub date: NaiveDate,
    pub energy_level: FactorLevel,
    pub stress_level: FactorLevel,
}

impl HumanFactorEntry {
    pub fn new(date: NaiveDate, energy_level: FactorLevel, stress_level: FactorLevel) -> Self {
        HumanFactorEntry { date, energy_level, stress_level }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveCapacity {
    pub smoothed_energy: f64,
    pub smoothed_stress: f64,
    pub multiplier: f64,
}

/// Blend today's report with the mean of past reports. A missing report for
/// today counts as Normal on both axes; an empty history means 1.0.
pub fn cognitive_capacity(today: Option<&HumanFactorEntry>, history: &[HumanFactorEntry]) -> CognitiveCapacity {
    let (today_energy, today_stress) = today
        .map(|e| (e.energy_level.energy_multiplier(), e.stress_level.stress_multiplier()))
        .unwrap_or((1.0, 1.0));

    let (history_energy, history_stress) = if history.is_empty() {
        (1.0, 1.0)
    } else {
        let n = history.len() as f64;
        let energy: f64 = history.iter().map(|e| e.energy_level.energy_multiplier()).sum();
        let stress: f64 = history.iter().map(|e| e.stress_level.stress_multiplier()).sum();
        (energy / n, stress / n)
    };

    let smoothed_energy = TODAY_WEIGHT * today_energy + HISTORY_WEIGHT * history_energy;
    let smoothed_stress = TODAY_WEIGHT * today_stress + HISTORY_WEIGHT * history_stress;

    CognitiveCapacity {
        smoothed_energy,
        smoothed_stress,
        multiplier: (smoothed_energy + smoothed_stress) / 2.0,
    }
}

/// Convenience wrapper returning only the multiplier
pub fn cognitive_capacity_multiplier(today: Option<&HumanFactorEntry>, history: &[HumanFactorEntry]) -> f64 {
    cognitive_capacity(today, history).multiplier
}

/// Split stored reports into today's entry and the preceding `window_days` of history
pub fn split_reports(
    entries: &[HumanFactorEntry],
    today: NaiveDate,
    window_days: u32,
) -> (Option<HumanFactorEntry>, Vec<HumanFactorEntry>) {
    let current = entries.iter().find(|e| e.date == today).cloned();
    let cutoff = today - chrono::Duration::days(window_days as i64);
    let mut history: Vec<HumanFactorEntry> = entries
        .iter()
        .filter(|e| e.date < today && e.date >= cutoff)
        .cloned()
        .collect();
    history.sort_by_key(|e| e.date);
    (current, history)
}

pub fn human_factors_path(root: &Path) -> PathBuf {
    root.join("human_factors.json")
}

/// Load stored self-reports; a missing file means no reports yet
pub async fn load_human_factors(root: &Path) -> Result<Vec<HumanFactorEntry>, StudyError> {
    let path = human_factors_path(root);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => serde_json::from_str(&content)
            .map_err(|e| StudyError::new(
                format!("Failed to parse human_factors.json: {}", e),
                "json_parse"
            ).with_context(format!("path: {:?}", path))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(StudyError::new(
            format!("Failed to read human_factors.json: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path))),
    }
}
