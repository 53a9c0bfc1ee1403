mod common;

use common::*;
use studyplan_lib::diagnostics::Diagnostics;
use studyplan_lib::planner::allocation::AllocationStrategy;
use studyplan_lib::planner::sequencer::pack_units;
use studyplan_lib::planner::{PlanAssembler, RankedSubject};
use studyplan_lib::priority::{PriorityBreakdown, PriorityResult, ReasoningFlags};
use studyplan_lib::subjects::model::StrategicState;

fn ranked(id: i64, name: &str, mode: StrategicState, priority: f64, durability: f64) -> RankedSubject {
    RankedSubject {
        subject_id: id,
        name: name.to_string(),
        diagnostics: Diagnostics {
            strategic_mode: mode,
            durability_factor: durability,
            ..Diagnostics::default()
        },
        priority: PriorityResult {
            final_priority: priority,
            flags: ReasoningFlags::default(),
            breakdown: PriorityBreakdown {
                base_priority: priority,
                confidence_modulator: 1.0,
                cognitive_multiplier: 1.0,
                discovery_multiplier: 1.0,
                roi_multiplier: 1.0,
                urgency_bonus: 0.0,
                recency_multiplier: 1.0,
            },
        },
        reasoning: String::new(),
    }
}

fn cycle_subjects() -> Vec<RankedSubject> {
    vec![
        ranked(1, "A", StrategicState::DeepWork, 10.0, 0.9),
        ranked(2, "B", StrategicState::Conquer, 8.0, 0.9),
        ranked(3, "C", StrategicState::Discovery, 5.0, 0.0),
        ranked(4, "D", StrategicState::Maintain, 3.0, 1.0),
    ]
}

fn assembler(days: u32) -> PlanAssembler {
    PlanAssembler {
        strategy: AllocationStrategy::Adaptive,
        available_minutes: 180,
        block_duration_minutes: 60,
        cycle_duration_days: days,
    }
}

fn minutes(plan: &studyplan_lib::planner::scaffold::ScaffoldPlan) -> Vec<(i64, u32)> {
    plan.sessions.iter().map(|s| (s.subject_id, s.allocated_minutes)).collect()
}

#[test]
fn test_balanced_plan_with_maintenance_block() {
    let scaffold = assembler(7).strategic_view(&cycle_subjects());
    let balanced = &scaffold.recommended_plan;

    assert_eq!(balanced.name, "Balanced");
    assert_eq!(minutes(balanced), vec![(1, 80), (2, 60), (3, 40), (4, 30)]);
    assert_eq!(balanced.total_minutes, 210);
}

#[test]
fn test_alternative_plans() {
    let scaffold = assembler(7).strategic_view(&cycle_subjects());
    assert_eq!(scaffold.alternative_plans.len(), 2);

    let deep = &scaffold.alternative_plans[0];
    assert_eq!(deep.name, "Deep Work");
    assert_eq!(minutes(deep), vec![(1, 70), (2, 56), (3, 54), (4, 30)]);
    assert!(deep.description.contains("A and B"));

    let review = &scaffold.alternative_plans[1];
    assert_eq!(review.name, "Review & Reinforce");
    assert_eq!(minutes(review), vec![(1, 40), (3, 40), (2, 30), (4, 30)]);
}

#[test]
fn test_alternatives_omitted_when_not_applicable() {
    let subjects = vec![
        ranked(3, "C", StrategicState::Discovery, 5.0, 0.9),
        ranked(4, "D", StrategicState::Maintain, 3.0, 1.0),
    ];
    let scaffold = assembler(7).strategic_view(&subjects);
    assert!(scaffold.alternative_plans.is_empty());
    assert_eq!(minutes(&scaffold.recommended_plan), vec![(3, 110), (4, 30)]);
}

#[test]
fn test_tactical_view_round_robin() {
    let subjects = cycle_subjects();
    let units = vec![
        unit(3, 1, 20, 3, false),
        unit(1, 1, 30, 1, false),
        unit(2, 1, 30, 2, false),
        unit(20, 2, 100, 1, false),
        unit(30, 3, 30, 1, false),
        unit(40, 4, 10, 1, false),
    ];
    let assembler = assembler(3);
    let scaffold = assembler.strategic_view(&subjects);
    let tasks = assembler.tactical_view(&subjects, &scaffold, &units);

    let placed: Vec<(i64, u32)> = tasks.iter().map(|t| (t.work_unit_id, t.day_index)).collect();
    // Unit 20 overflows B's hour; D is maintenance and gets no tasks
    assert_eq!(placed, vec![(1, 0), (2, 1), (3, 2), (30, 0)]);
    assert_eq!(tasks[3].subject_name, "C");
}

#[test]
fn test_zero_day_cycle_uses_single_day() {
    let subjects = cycle_subjects();
    let units = vec![unit(1, 1, 30, 1, false), unit(2, 1, 30, 2, false)];
    let assembler = assembler(0);
    let scaffold = assembler.strategic_view(&subjects);
    let tasks = assembler.tactical_view(&subjects, &scaffold, &units);

    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.day_index == 0));
}

#[test]
fn test_completed_units_do_not_use_budget() {
    let done = unit(1, 1, 50, 1, true);
    let next = unit(2, 1, 40, 2, false);
    let last = unit(3, 1, 40, 3, false);
    let packed = pack_units(&[&done, &next, &last], 60);

    let ids: Vec<i64> = packed.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_oversized_unit_stops_packing() {
    let first = unit(1, 1, 30, 1, false);
    let huge = unit(2, 1, u32::MAX, 2, false);
    let packed = pack_units(&[&first, &huge], 60);

    let ids: Vec<i64> = packed.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1]);
}
