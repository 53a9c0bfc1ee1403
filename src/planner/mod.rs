pub mod allocation;
pub mod scaffold;
pub mod sequencer;
pub mod store;

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::diagnostics::Diagnostics;
use crate::priority::PriorityResult;
use crate::subjects::model::{StrategicState, WorkUnit};
use allocation::{allocate, AllocationStrategy};
use scaffold::{balanced_plan, deep_work_plan, review_plan, PlanScaffold};
use sequencer::{sequence, SequencedTask};

/// A subject after diagnosis, scoring and reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSubject {
    pub subject_id: i64,
    pub name: String,
    pub diagnostics: Diagnostics,
    pub priority: PriorityResult,
    pub reasoning: String,
}

impl RankedSubject {
    pub fn is_maintenance(&self) -> bool {
        self.diagnostics.strategic_mode == StrategicState::Maintain
    }
}

/// Output of one planning run. Treated as a cache that goes stale each day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub cycle_id: i64,
    pub generated_on: NaiveDate,
    pub cycle_focus: String,
    pub sequenced_plan: Vec<SequencedTask>,
    pub plan_scaffold: PlanScaffold,
    /// Sorted by final priority, highest first
    pub processed_subjects: Vec<RankedSubject>,
}

impl Plan {
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.generated_on != today
    }
}

/// Turns ranked subjects into the strategic and tactical views of a plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanAssembler {
    pub strategy: AllocationStrategy,
    pub available_minutes: u32,
    pub block_duration_minutes: u32,
    pub cycle_duration_days: u32,
}

impl PlanAssembler {
    fn split<'a>(ranked: &'a [RankedSubject]) -> (Vec<&'a RankedSubject>, Vec<&'a RankedSubject>) {
        ranked.iter().partition(|s| !s.is_maintenance())
    }

    /// `ranked` must be ordered by final priority, highest first.
    pub fn strategic_view(&self, ranked: &[RankedSubject]) -> PlanScaffold {
        let (processed, maintain) = Self::split(ranked);
        let priorities: Vec<f64> = processed.iter().map(|s| s.priority.final_priority).collect();
        let minutes = allocate(
            self.strategy,
            &priorities,
            self.available_minutes,
            self.block_duration_minutes,
        );

        let recommended_plan = balanced_plan(&processed, &minutes, &maintain);
        let alternative_plans = [
            deep_work_plan(&processed, &maintain, self.available_minutes),
            review_plan(&processed, &minutes, &maintain),
        ]
        .into_iter()
        .flatten()
        .collect();

        tracing::debug!(
            strategy = self.strategy.as_str(),
            processed = processed.len(),
            maintain = maintain.len(),
            total_minutes = recommended_plan.total_minutes,
            "Strategic view assembled"
        );

        PlanScaffold { recommended_plan, alternative_plans }
    }

    /// Day-sequenced tasks sized by the recommended plan's allocations.
    pub fn tactical_view(
        &self,
        ranked: &[RankedSubject],
        scaffold: &PlanScaffold,
        work_units: &[WorkUnit],
    ) -> Vec<SequencedTask> {
        let (processed, _) = Self::split(ranked);
        sequence(
            &processed,
            &scaffold.recommended_plan,
            work_units,
            self.cycle_duration_days,
        )
    }
}
