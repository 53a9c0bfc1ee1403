mod common;

use common::*;
use studyplan_lib::human_factors::{
    cognitive_capacity, cognitive_capacity_multiplier, split_reports, FactorLevel,
    HumanFactorEntry,
};

fn report(day: u32, energy: FactorLevel, stress: FactorLevel) -> HumanFactorEntry {
    HumanFactorEntry::new(date(2024, 3, day), energy, stress)
}

#[test]
fn test_no_reports_is_neutral() {
    assert!(approx(cognitive_capacity_multiplier(None, &[]), 1.0));
}

#[test]
fn test_fresh_and_relaxed_today() {
    let today = report(10, FactorLevel::High, FactorLevel::Low);
    let capacity = cognitive_capacity(Some(&today), &[]);

    assert!(approx(capacity.smoothed_energy, 1.12));
    assert!(approx(capacity.smoothed_stress, 1.06));
    assert!(approx(capacity.multiplier, 1.09));
}

#[test]
fn test_history_is_averaged() {
    let history = vec![
        report(8, FactorLevel::Low, FactorLevel::High),
        report(9, FactorLevel::High, FactorLevel::Normal),
    ];
    let capacity = cognitive_capacity(None, &history);

    // energy: 0.6 + 0.4 * 1.0, stress: 0.6 + 0.4 * 0.9
    assert!(approx(capacity.smoothed_energy, 1.0));
    assert!(approx(capacity.smoothed_stress, 0.96));
    assert!(approx(capacity.multiplier, 0.98));
}

#[test]
fn test_unknown_label_weighs_like_normal() {
    let json = r#"{"date":"2024-03-10","energy_level":"Exhausted","stress_level":"Normal"}"#;
    let entry: HumanFactorEntry = serde_json::from_str(json).unwrap();

    assert_eq!(entry.energy_level, FactorLevel::Unknown);
    assert!(approx(cognitive_capacity_multiplier(Some(&entry), &[]), 1.0));
    assert_eq!(FactorLevel::from_label(" LOW "), FactorLevel::Low);
    assert_eq!(FactorLevel::from_label("meh"), FactorLevel::Unknown);
}

#[test]
fn test_stored_labels_ignore_case() {
    let json = r#"{"date":"2024-03-10","energy_level":"high","stress_level":"LOW"}"#;
    let entry: HumanFactorEntry = serde_json::from_str(json).unwrap();

    assert_eq!(entry.energy_level, FactorLevel::High);
    assert_eq!(entry.stress_level, FactorLevel::Low);
    assert_eq!(serde_json::to_string(&FactorLevel::High).unwrap(), "\"High\"");
}

#[test]
fn test_split_reports_keeps_window() {
    let entries = vec![
        report(9, FactorLevel::High, FactorLevel::Normal),
        report(2, FactorLevel::Low, FactorLevel::Low),
        report(10, FactorLevel::Normal, FactorLevel::High),
        report(3, FactorLevel::Low, FactorLevel::Normal),
    ];
    let (current, history) = split_reports(&entries, today(), 7);

    assert_eq!(current.map(|e| e.stress_level), Some(FactorLevel::High));
    let dates: Vec<_> = history.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![date(2024, 3, 3), date(2024, 3, 9)]);
}
