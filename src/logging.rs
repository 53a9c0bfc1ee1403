use crate::subjects::model::StrategicState;

/// Initialize structured logging with tracing
/// This should be called once at application startup; later calls are ignored.
pub fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .json() // JSON output for structured logging
        );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global tracing subscriber already installed");
        return;
    }

    tracing::info!("Structured logging initialized");
}

pub fn log_regression_veto(subject_id: i64, from: StrategicState, to: StrategicState) {
    tracing::info!(
        subject_id = subject_id,
        from = %from,
        proposed = %to,
        "Hysteresis gate vetoed regression"
    );
}

pub fn log_transition(subject_id: i64, from: StrategicState, to: StrategicState) {
    tracing::info!(
        subject_id = subject_id,
        from = %from,
        to = %to,
        "Strategic state transition"
    );
}

pub fn log_modifier(subject_id: i64, modifier: &str, priority: f64) {
    tracing::info!(
        subject_id = subject_id,
        modifier = modifier,
        priority = priority,
        "Tactical modifier applied"
    );
}
