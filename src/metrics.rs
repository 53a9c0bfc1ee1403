use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for planning runs.
/// All metrics are atomic counters for thread-safety
#[derive(Clone, Default, Debug)]
pub struct PlanningMetrics {
    pub runs_total: Arc<AtomicU64>,
    pub subjects_diagnosed: Arc<AtomicU64>,
    /// Regressions the hysteresis gate refused
    pub regressions_vetoed: Arc<AtomicU64>,
    pub discovery_boosts: Arc<AtomicU64>,
    pub roi_warnings: Arc<AtomicU64>,
    pub urgency_shocks: Arc<AtomicU64>,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub runs_total: u64,
    pub subjects_diagnosed: u64,
    pub regressions_vetoed: u64,
    pub discovery_boosts: u64,
    pub roi_warnings: u64,
    pub urgency_shocks: u64,
}

impl PlanningMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_run(&self) {
        self.runs_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_subject(&self) {
        self.subjects_diagnosed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_veto(&self) {
        self.regressions_vetoed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flags(&self, flags: &crate::priority::ReasoningFlags) {
        if flags.discovery_boost_applied {
            self.discovery_boosts.fetch_add(1, Ordering::Relaxed);
        }
        if flags.roi_warning {
            self.roi_warnings.fetch_add(1, Ordering::Relaxed);
        }
        if flags.urgency_shock {
            self.urgency_shocks.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs_total: self.runs_total.load(Ordering::Relaxed),
            subjects_diagnosed: self.subjects_diagnosed.load(Ordering::Relaxed),
            regressions_vetoed: self.regressions_vetoed.load(Ordering::Relaxed),
            discovery_boosts: self.discovery_boosts.load(Ordering::Relaxed),
            roi_warnings: self.roi_warnings.load(Ordering::Relaxed),
            urgency_shocks: self.urgency_shocks.load(Ordering::Relaxed),
        }
    }
}
