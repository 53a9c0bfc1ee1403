use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use crate::error::StudyError;
use crate::human_factors::HumanFactorEntry;
use crate::planner::store::StoredPlan;
use crate::sessions::StudySession;
use crate::state::app::AppState;
use crate::subjects::store::CycleRecord;

/// SHA-256 over everything a plan depends on
pub fn inputs_fingerprint(
    cycle: &CycleRecord,
    sessions: &[StudySession],
    reports: &[HumanFactorEntry],
) -> Result<String, StudyError> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(cycle)?);
    hasher.update(serde_json::to_vec(sessions)?);
    hasher.update(serde_json::to_vec(reports)?);
    Ok(format!("{:x}", hasher.finalize()))
}

/// A stored plan is reusable when it was built today from the same inputs
pub fn is_reusable(stored: &StoredPlan, cycle_id: i64, fingerprint: &str, today: NaiveDate) -> bool {
    stored.plan.cycle_id == cycle_id
        && stored.fingerprint == fingerprint
        && !stored.plan.is_stale(today)
}

/// Check cache and return if found
pub fn get_cached(
    state: &AppState,
    cycle_id: i64,
    fingerprint: &str,
    today: NaiveDate,
) -> Option<StoredPlan> {
    let mut cache = state.plan_cache.write();

    match cache.get(&cycle_id).cloned() {
        Some(stored) if is_reusable(&stored, cycle_id, fingerprint, today) => {
            tracing::debug!(cycle_id = cycle_id, "Plan cache hit");
            Some(stored)
        }
        Some(_) => {
            tracing::debug!(cycle_id = cycle_id, "Cached plan is stale");
            cache.pop(&cycle_id);
            None
        }
        None => {
            tracing::debug!(cycle_id = cycle_id, "Plan cache miss");
            None
        }
    }
}

/// Store plan in cache
pub fn cache_plan(state: &AppState, stored: &StoredPlan) {
    state.plan_cache.write().put(stored.plan.cycle_id, stored.clone());
}
