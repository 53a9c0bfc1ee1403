use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use lazy_static::lazy_static;
use crate::planner::allocation::AllocationStrategy;

/// Cycle-level defaults. A cycle bundle may override any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub strategy: AllocationStrategy,
    /// Block length handed to every subject under the fixed strategy
    pub block_duration_minutes: u32,
    pub available_minutes: u32,
    pub cycle_duration_days: u32,
    /// How many past daily self-reports feed the human-factor smoother
    pub human_factor_window_days: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            strategy: AllocationStrategy::Adaptive,
            block_duration_minutes: 60,
            available_minutes: 600,
            cycle_duration_days: 7,
            human_factor_window_days: 7,
        }
    }
}

fn get_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("STUDYPLAN_CONFIG") {
        return PathBuf::from(path);
    }
    crate::paths::data_dir().join("planner.toml")
}

fn load_planner_config_internal() -> PlannerConfig {
    let config_path = get_config_path();

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<PlannerConfig>(&content) {
            Ok(config) => {
                tracing::info!(path = ?config_path, "Loaded planner config");
                return config;
            }
            Err(e) => {
                tracing::warn!(
                    path = ?config_path,
                    error = %e,
                    "Failed to parse planner.toml, using defaults"
                );
            }
        },
        Err(e) => {
            tracing::debug!(path = ?config_path, error = %e, "No planner.toml found");
        }
    }

    PlannerConfig::default()
}

lazy_static! {
    static ref PLANNER_CONFIG: PlannerConfig = load_planner_config_internal();
}

/// Get the cached planner configuration (loaded once at startup)
pub fn get_planner_config() -> &'static PlannerConfig {
    &PLANNER_CONFIG
}

/// Parse a config document, keeping defaults for missing keys
pub fn parse_planner_config(content: &str) -> Result<PlannerConfig, crate::error::StudyError> {
    Ok(toml::from_str::<PlannerConfig>(content)?)
}
