#![allow(dead_code)]

use chrono::NaiveDate;
use studyplan_lib::sessions::{QuestionRecord, StudySession};
use studyplan_lib::subjects::model::{StrategicState, SubjectInCycle, WorkUnit};

pub const CYCLE_ID: i64 = 1;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn today() -> NaiveDate {
    date(2024, 3, 10)
}

pub fn subject(id: i64, name: &str, relevance: u32) -> SubjectInCycle {
    SubjectInCycle::new(id, CYCLE_ID, name, relevance, 3, 3, date(2024, 1, 1))
}

pub fn subject_in(id: i64, name: &str, relevance: u32, state: StrategicState) -> SubjectInCycle {
    let mut s = subject(id, name, relevance);
    s.strategic_state = state;
    s
}

/// Session with `correct` right answers out of `total`, all on one topic
pub fn session(
    id: i64,
    subject_id: i64,
    started_at: &str,
    secs: u64,
    correct: usize,
    total: usize,
    topic: &str,
) -> StudySession {
    let questions = (0..total)
        .map(|i| QuestionRecord { topic: topic.to_string(), is_correct: i < correct })
        .collect();
    StudySession {
        id,
        subject_id,
        started_at: started_at.to_string(),
        liquid_duration_secs: secs,
        questions,
    }
}

pub fn unit(id: i64, subject_id: i64, minutes: u32, order: i32, completed: bool) -> WorkUnit {
    WorkUnit {
        id,
        subject_id,
        title: format!("Unit {}", id),
        unit_type: "reading".to_string(),
        estimated_minutes: minutes,
        topic: None,
        is_completed: completed,
        sequence_order: order,
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
