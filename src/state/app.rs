use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use parking_lot::{Mutex, RwLock};
use lru::LruCache;
use crate::error::StudyError;
use crate::metrics::PlanningMetrics;
use crate::planner::store::StoredPlan;

const PLAN_CACHE_CAPACITY: usize = 16;

/// Application-wide state container.
/// All mutable state is centralized here and passed explicitly to functions.
#[derive(Clone)]
pub struct AppState {
    /// Recent plans keyed by cycle id (LRU with bounded size)
    pub plan_cache: Arc<RwLock<LruCache<i64, StoredPlan>>>,
    /// Cycles with a planning run in flight
    pub active_runs: Arc<Mutex<HashSet<i64>>>,
    pub metrics: PlanningMetrics,
}

/// Holds a cycle's run slot; releases it on drop.
pub struct RunGuard {
    active_runs: Arc<Mutex<HashSet<i64>>>,
    cycle_id: i64,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.active_runs.lock().remove(&self.cycle_id);
    }
}

impl AppState {
    /// Create a new AppState with default values
    pub fn new() -> Self {
        AppState {
            plan_cache: Arc::new(RwLock::new(
                LruCache::new(NonZeroUsize::new(PLAN_CACHE_CAPACITY).expect("capacity > 0"))
            )),
            active_runs: Arc::new(Mutex::new(HashSet::new())),
            metrics: PlanningMetrics::new(),
        }
    }

    /// Claim the run slot for a cycle. Hysteresis updates are read-then-write,
    /// so two runs on the same cycle must never overlap.
    pub fn begin_run(&self, cycle_id: i64) -> Result<RunGuard, StudyError> {
        let mut runs = self.active_runs.lock();
        if !runs.insert(cycle_id) {
            return Err(StudyError::new(
                "A planning run for this cycle is already in progress",
                "concurrency"
            ).with_context(format!("cycle: {}", cycle_id)));
        }
        Ok(RunGuard {
            active_runs: Arc::clone(&self.active_runs),
            cycle_id,
        })
    }

    pub fn is_running(&self, cycle_id: i64) -> bool {
        self.active_runs.lock().contains(&cycle_id)
    }

    /// Drop any cached plan for a cycle so the next refresh recomputes it
    pub fn invalidate_plan(&self, cycle_id: i64) {
        self.plan_cache.write().pop(&cycle_id);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
