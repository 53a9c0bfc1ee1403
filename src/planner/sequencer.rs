use serde::{Serialize, Deserialize};
use crate::planner::scaffold::ScaffoldPlan;
use crate::planner::RankedSubject;
use crate::subjects::model::WorkUnit;

/// One work unit placed on a day of the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencedTask {
    pub day_index: u32,
    pub subject_id: i64,
    pub subject_name: String,
    pub work_unit_id: i64,
    pub title: String,
    pub unit_type: String,
    pub estimated_minutes: u32,
    pub topic: Option<String>,
    pub is_completed: bool,
}

/// First-fit packing of a subject's ordered units into its budget. Completed
/// units are listed without consuming budget; packing stops at the first
/// pending unit that would overflow.
pub fn pack_units<'a>(units: &[&'a WorkUnit], budget_minutes: u32) -> Vec<&'a WorkUnit> {
    let mut packed = Vec::new();
    let mut used = 0u32;
    for unit in units {
        if unit.is_completed {
            packed.push(*unit);
            continue;
        }
        if used.saturating_add(unit.estimated_minutes) > budget_minutes {
            break;
        }
        used += unit.estimated_minutes;
        packed.push(*unit);
    }
    packed
}

/// Tactical view. Subjects are walked in the order given and tasks are spread
/// round-robin over the cycle's days.
pub fn sequence(
    processed: &[&RankedSubject],
    plan: &ScaffoldPlan,
    work_units: &[WorkUnit],
    cycle_duration_days: u32,
) -> Vec<SequencedTask> {
    let days = cycle_duration_days.max(1);
    let mut tasks = Vec::new();
    let mut running_index = 0u32;

    for subject in processed {
        let budget = plan.minutes_for(subject.subject_id).unwrap_or(0);
        let mut units: Vec<&WorkUnit> = work_units
            .iter()
            .filter(|u| u.subject_id == subject.subject_id)
            .collect();
        units.sort_by(|a, b| a.sequence_order.cmp(&b.sequence_order).then(a.id.cmp(&b.id)));

        for unit in pack_units(&units, budget) {
            tasks.push(SequencedTask {
                day_index: running_index % days,
                subject_id: subject.subject_id,
                subject_name: subject.name.clone(),
                work_unit_id: unit.id,
                title: unit.title.clone(),
                unit_type: unit.unit_type.clone(),
                estimated_minutes: unit.estimated_minutes,
                topic: unit.topic.clone(),
                is_completed: unit.is_completed,
            });
            running_index += 1;
        }

        tracing::debug!(
            subject_id = subject.subject_id,
            budget_minutes = budget,
            "Work units sequenced"
        );
    }

    tasks
}
