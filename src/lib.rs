pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod human_factors;
pub mod logging;
pub mod metrics;
pub mod paths;
pub mod planner;
pub mod priority;
pub mod queue;
pub mod reasoning;
pub mod sessions;
pub mod state;
pub mod subjects;
pub mod tutor;

use std::path::Path;
use anyhow::Context;
use chrono::NaiveDate;
use crate::config::PlannerConfig;
use crate::error::StudyError;
use crate::human_factors::{load_human_factors, split_reports, HumanFactorEntry};
use crate::planner::store::StoredPlan;
use crate::planner::Plan;
use crate::sessions::{load_all_sessions, StudySession};
use crate::state::AppState;
use crate::subjects::store::{apply_state_updates, load_cycle, save_cycle, CycleRecord};
use crate::tutor::{CollectingSink, CycleBundle, Tutor};

async fn load_inputs(
    root: &Path,
) -> Result<(CycleRecord, Vec<StudySession>, Vec<HumanFactorEntry>), StudyError> {
    let cycle = load_cycle(root).await?;
    let sessions = load_all_sessions(root).await?;
    let reports = load_human_factors(root).await?;
    Ok((cycle, sessions, reports))
}

/// Return today's plan for the cycle stored under `root`, rebuilding it when
/// the day changed, the inputs changed, or `force` is set. A rebuild persists
/// the updated subject states and the new plan; a failed run persists nothing.
pub async fn refresh_plan(
    state: &AppState,
    config: &PlannerConfig,
    root: &Path,
    today: NaiveDate,
    force: bool,
) -> Result<Plan, StudyError> {
    let (cycle, sessions, reports) = load_inputs(root).await?;
    let cycle_id = cycle.cycle_id;
    let fingerprint = cache::inputs_fingerprint(&cycle, &sessions, &reports)?;

    if force {
        state.invalidate_plan(cycle_id);
    } else {
        if let Some(stored) = cache::get_cached(state, cycle_id, &fingerprint, today) {
            return Ok(stored.plan);
        }
        match planner::store::load(root).await {
            Ok(Some(stored)) if cache::is_reusable(&stored, cycle_id, &fingerprint, today) => {
                tracing::info!(cycle_id = cycle_id, "Reusing today's stored plan");
                cache::cache_plan(state, &stored);
                return Ok(stored.plan);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load stored plan, rebuilding");
            }
        }
    }

    // Hysteresis is read-then-write: re-read everything under the run slot
    let _guard = state.begin_run(cycle_id)?;
    let (cycle, sessions, reports) = load_inputs(root).await?;
    if cycle.cycle_id != cycle_id {
        return Err(StudyError::new(
            "cycle.json changed identity while waiting for a planning run",
            "concurrency"
        ).with_context(format!("expected cycle: {}, found: {}", cycle_id, cycle.cycle_id)));
    }
    let (human_factor_today, human_factor_history) =
        split_reports(&reports, today, config.human_factor_window_days);
    let bundle = CycleBundle {
        cycle,
        sessions,
        human_factor_today,
        human_factor_history,
        today,
    };

    let tutor = Tutor::new(config.clone(), state.metrics.clone());
    let mut sink = CollectingSink::default();
    let plan = tutor.generate_plan(&bundle, &mut sink)?;

    let CycleBundle { mut cycle, sessions, .. } = bundle;
    apply_state_updates(&mut cycle, &sink.updates);
    save_cycle(root, &cycle).await?;

    // Fingerprint the post-run state so a same-day refresh finds this plan
    let stored = StoredPlan {
        fingerprint: cache::inputs_fingerprint(&cycle, &sessions, &reports)?,
        plan,
    };
    planner::store::save(root, &stored).await?;
    cache::cache_plan(state, &stored);

    Ok(stored.plan)
}

/// Entry point of the `studyplan` binary: plan today's cycle and print it as JSON.
pub fn run() -> Result<(), StudyError> {
    // Initialize structured logging first
    logging::init_logging();
    tracing::info!("studyplan starting");

    let force = std::env::args().skip(1).any(|arg| arg == "--force");
    let config = config::get_planner_config();
    let root = paths::data_dir();
    let state = AppState::new();

    let rt = tokio::runtime::Runtime::new()
        .context("Failed to create async runtime")?;

    let today = chrono::Local::now().date_naive();
    let plan = rt.block_on(refresh_plan(&state, config, &root, today, force))?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
