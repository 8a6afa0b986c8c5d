use crate::error::ConfigError;
use crate::types::duration_from_secs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tuning for one fix acquisition session.
///
/// Defaults match the capture screen: "nearest ten meters" accuracy, a one
/// minute budget, and a 10 s / 1 m stall rule for devices that cannot improve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub target_accuracy_m: f64,
    pub max_sample_age_secs: f64,
    pub timeout_secs: f64,
    pub stall_distance_m: f64,
    pub stall_interval_secs: f64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            target_accuracy_m: 10.0,
            max_sample_age_secs: 5.0,
            timeout_secs: 60.0,
            stall_distance_m: 1.0,
            stall_interval_secs: 10.0,
        }
    }
}

impl AcquisitionConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: AcquisitionConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// All values finite and non-negative, target accuracy above zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("target_accuracy_m", self.target_accuracy_m),
            ("max_sample_age_secs", self.max_sample_age_secs),
            ("timeout_secs", self.timeout_secs),
            ("stall_distance_m", self.stall_distance_m),
            ("stall_interval_secs", self.stall_interval_secs),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.target_accuracy_m == 0.0 {
            return Err(ConfigError::ZeroTargetAccuracy);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        duration_from_secs(self.timeout_secs)
    }
}
