mod common;

use common::*;
use studyplan_lib::error::StudyError;
use studyplan_lib::planner::allocation::{ADAPTIVE_MAX_MINUTES, ADAPTIVE_MIN_MINUTES};
use studyplan_lib::subjects::model::{HysteresisRecord, StrategicState};
use studyplan_lib::subjects::store::CycleRecord;
use studyplan_lib::tutor::{compose_cycle_focus, CollectingSink, CycleBundle, SubjectStateUpdate, Tutor};

fn bundle(subjects: Vec<studyplan_lib::subjects::model::SubjectInCycle>) -> CycleBundle {
    CycleBundle::new(CycleRecord::new(CYCLE_ID, subjects), today())
}

#[test]
fn test_first_run_welcomes_and_allocates() {
    let mut b = bundle(vec![subject(1, "Algebra", 4)]);
    b.sessions.push(session(1, 1, "2024-03-10T08:00:00", 3600, 8, 10, "equations"));

    let tutor = Tutor::default();
    let mut sink = CollectingSink::default();
    let plan = tutor.generate_plan(&b, &mut sink).unwrap();

    assert_eq!(plan.cycle_focus, "Welcome! Let's get started by exploring Algebra.");
    assert_eq!(plan.generated_on, today());
    assert_eq!(plan.processed_subjects.len(), 1);
    assert_eq!(plan.processed_subjects[0].diagnostics.strategic_mode, StrategicState::Conquer);

    let minutes = plan.plan_scaffold.recommended_plan.minutes_for(1).unwrap();
    assert!((ADAPTIVE_MIN_MINUTES..=ADAPTIVE_MAX_MINUTES).contains(&minutes));

    assert_eq!(sink.updates.len(), 1);
    assert_eq!(sink.updates[0].hysteresis.consecutive_cycles_in_state, 1);
    assert_eq!(sink.updates[0].hysteresis.last_transition_date, Some(today()));
}

#[test]
fn test_new_subject_without_history_starts_in_discovery() {
    let b = bundle(vec![subject(1, "Algebra", 4)]);

    let plan = Tutor::default().generate_plan(&b, &mut CollectingSink::default()).unwrap();

    assert_eq!(plan.processed_subjects.len(), 1);
    assert_eq!(plan.processed_subjects[0].diagnostics.strategic_mode, StrategicState::Discovery);
    let sessions = &plan.plan_scaffold.recommended_plan.sessions;
    assert_eq!(sessions.len(), 1);
    assert!((ADAPTIVE_MIN_MINUTES..=ADAPTIVE_MAX_MINUTES).contains(&sessions[0].allocated_minutes));
    assert!(plan.cycle_focus.contains("Welcome!"));
}

#[test]
fn test_same_inputs_same_plan() {
    let mut b = bundle(vec![subject(1, "Algebra", 4), subject(2, "History", 2)]);
    b.sessions.push(session(1, 1, "2024-03-08 18:00:00", 5400, 12, 20, "equations"));
    b.sessions.push(session(2, 2, "2024-03-09 18:00:00", 1800, 4, 5, "wars"));

    let tutor = Tutor::default();
    let first = tutor.generate_plan(&b, &mut CollectingSink::default()).unwrap();
    let second = tutor.generate_plan(&b, &mut CollectingSink::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sink_sees_every_active_subject() {
    let mut idle = subject(3, "Art", 5);
    idle.is_active = false;
    let b = bundle(vec![subject(1, "Algebra", 4), subject(2, "History", 2), idle]);

    let mut sink = CollectingSink::default();
    let plan = Tutor::default().generate_plan(&b, &mut sink).unwrap();

    let mut ids: Vec<i64> = sink.updates.iter().map(|u| u.subject_id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2]);
    assert!(plan.processed_subjects.iter().all(|s| s.subject_id != 3));
}

#[test]
fn test_sink_failure_aborts_run() {
    let b = bundle(vec![subject(1, "Algebra", 4), subject(2, "History", 2)]);
    let mut failing = |update: &SubjectStateUpdate| -> Result<(), StudyError> {
        if update.subject_id == 2 {
            return Err(StudyError::new("disk full", "sink"));
        }
        Ok(())
    };

    let err = Tutor::default().generate_plan(&b, &mut failing).unwrap_err();
    assert_eq!(err.stage, "sink");
    assert_eq!(err.subject_id, Some(2));
}

#[test]
fn test_invalid_bundles_are_rejected() {
    let b = bundle(vec![subject(1, "Algebra", 4), subject(1, "Algebra again", 2)]);
    let err = Tutor::default().generate_plan(&b, &mut CollectingSink::default()).unwrap_err();
    assert_eq!(err.stage, "validation");
    assert_eq!(err.subject_id, Some(1));

    let mut orphan = bundle(vec![subject(1, "Algebra", 4)]);
    orphan.cycle.work_units.push(unit(5, 99, 30, 1, false));
    assert!(orphan.validate().is_err());

    let mut no_time = bundle(vec![subject(1, "Algebra", 4)]);
    no_time.cycle.available_minutes = Some(0);
    let err = Tutor::default().generate_plan(&no_time, &mut CollectingSink::default()).unwrap_err();
    assert_eq!(err.stage, "validation");
}

#[test]
fn test_later_run_names_focus_and_counts_vetoes() {
    let mut s = subject_in(7, "Topology", 3, StrategicState::DeepWork);
    s.hysteresis = HysteresisRecord {
        consecutive_cycles_in_state: 1,
        last_transition_date: Some(date(2024, 3, 3)),
        last_mastery_score: 0.0,
    };
    let mut b = bundle(vec![s]);
    b.sessions.push(session(1, 7, "2024-03-09T18:00:00", 1800, 0, 10, "spaces"));

    let tutor = Tutor::default();
    let plan = tutor.generate_plan(&b, &mut CollectingSink::default()).unwrap();

    assert_eq!(plan.cycle_focus, "This cycle's focus: Topology.");
    assert_eq!(plan.processed_subjects[0].diagnostics.strategic_mode, StrategicState::DeepWork);
    let snapshot = tutor.metrics().snapshot();
    assert_eq!(snapshot.runs_total, 1);
    assert_eq!(snapshot.regressions_vetoed, 1);
}

#[test]
fn test_subjects_sorted_by_priority() {
    let mut b = bundle(vec![
        subject(1, "Algebra", 1),
        subject(2, "History", 5),
        subject(3, "Chemistry", 3),
    ]);
    b.sessions.push(session(1, 1, "2024-03-09", 7200, 18, 20, "equations"));

    let plan = Tutor::default().generate_plan(&b, &mut CollectingSink::default()).unwrap();
    let priorities: Vec<f64> = plan
        .processed_subjects
        .iter()
        .map(|s| s.priority.final_priority)
        .collect();
    assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
    assert!(plan.cycle_focus.starts_with("Welcome!"));
}

#[test]
fn test_empty_cycle_focus() {
    assert_eq!(
        compose_cycle_focus(true, &[]),
        "No active subjects in this cycle yet. Add one to get a plan."
    );
}
