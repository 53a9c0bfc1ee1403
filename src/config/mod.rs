pub mod planner;

pub use planner::{get_planner_config, parse_planner_config, PlannerConfig};
