use studyplan_lib::config::parse_planner_config;
use studyplan_lib::error::{BundleError, StudyError};
use studyplan_lib::planner::allocation::{
    adaptive_minutes, allocate, basic_minutes, proportional_split, AllocationStrategy,
};

#[test]
fn test_adaptive_rounds_to_ten_minutes() {
    assert_eq!(adaptive_minutes(&[10.0, 5.0, 8.0], 180), vec![80, 40, 60]);
}

#[test]
fn test_adaptive_clamps_to_bounds() {
    assert_eq!(adaptive_minutes(&[100.0, 1.0], 600), vec![110, 40]);
}

#[test]
fn test_adaptive_zero_priorities_get_minimum() {
    assert_eq!(adaptive_minutes(&[0.0, 0.0], 300), vec![40, 40]);
}

#[test]
fn test_basic_tiers() {
    assert_eq!(basic_minutes(&[10.0, 20.0, 30.0]), vec![45, 60, 90]);
    assert_eq!(basic_minutes(&[7.0, 7.0]), vec![60, 60]);
}

#[test]
fn test_fixed_uses_block_length() {
    assert_eq!(
        allocate(AllocationStrategy::Fixed, &[1.0, 50.0, 3.0], 600, 50),
        vec![50, 50, 50]
    );
}

#[test]
fn test_proportional_split() {
    assert_eq!(proportional_split(&[0.0, 0.0], 60.0), vec![30, 30]);
    assert_eq!(proportional_split(&[3.0, 1.0], 100.0), vec![75, 25]);
    assert!(proportional_split(&[], 100.0).is_empty());
}

#[test]
fn test_strategy_labels() {
    assert_eq!(AllocationStrategy::from_label("FIXED"), AllocationStrategy::Fixed);
    assert_eq!(AllocationStrategy::from_label("greedy"), AllocationStrategy::Adaptive);
    assert_eq!(serde_json::to_string(&AllocationStrategy::Basic).unwrap(), "\"basic\"");
}

#[test]
fn test_parse_config_keeps_defaults() {
    let config = parse_planner_config("strategy = \"basic\"\navailable_minutes = 300\n").unwrap();
    assert_eq!(config.strategy, AllocationStrategy::Basic);
    assert_eq!(config.available_minutes, 300);
    assert_eq!(config.block_duration_minutes, 60);
    assert_eq!(config.cycle_duration_days, 7);

    let unknown = parse_planner_config("strategy = \"greedy\"").unwrap();
    assert_eq!(unknown.strategy, AllocationStrategy::Adaptive);
}

#[test]
fn test_bad_config_is_config_error() {
    let err = parse_planner_config("available_minutes = \"lots\"").unwrap_err();
    assert_eq!(err.stage, "config");
}

#[test]
fn test_error_display() {
    let err = StudyError::new("sink failed", "sink").with_subject(4).with_context("disk full");
    assert_eq!(err.to_string(), "[sink] sink failed (subject: 4) (context: disk full)");

    let bundle: StudyError = BundleError::DuplicateSubject(9).into();
    assert_eq!(bundle.stage, "validation");
    assert_eq!(bundle.subject_id, Some(9));
    assert_eq!(bundle.source.as_deref(), Some("bundle"));
}

#[test]
fn test_startup_errors_keep_context_chain() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads");
    let err: StudyError = anyhow::Error::new(io).context("Failed to create async runtime").into();
    assert_eq!(err.stage, "startup");
    assert_eq!(err.message, "Failed to create async runtime: no threads");
    assert_eq!(err.source.as_deref(), Some("anyhow"));
}
