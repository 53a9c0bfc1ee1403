pub mod model;
pub mod store;
pub mod weights;

pub use model::{HysteresisRecord, StrategicState, SubjectInCycle, WorkUnit};
