pub mod scenario;

pub use scenario::{Scenario, ScenarioSource, ScenarioStep};

use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
