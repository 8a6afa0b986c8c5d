//! Sample accept policy and authorization preflight.
//!
//! Everything here is a pure function of config, current best fix and the
//! incoming sample, so the rules can be exercised without any location backend.

use super::config::AcquisitionConfig;
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Outcome of running one sample through the accept policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleVerdict {
    /// Fix older than `max_sample_age_secs` (cached reading)
    Stale,
    /// Negative accuracy radius
    Invalid,
    /// New best fix. `distance` is from the previous best (infinite if none).
    Improved { distance: f64, reached_target: bool },
    /// No improvement within `stall_distance_m` for longer than
    /// `stall_interval_secs`: accept the current best as final
    Stalled { interval_secs: f64 },
    /// Not more accurate than the current best
    NotBetter { distance: f64 },
}

pub fn assess_sample(
    config: &AcquisitionConfig,
    best: Option<&Position>,
    sample: &Position,
) -> SampleVerdict {
    if sample.age_secs > config.max_sample_age_secs {
        return SampleVerdict::Stale;
    }

    if !sample.has_valid_accuracy() {
        return SampleVerdict::Invalid;
    }

    let distance = best
        .map(|b| b.distance_to(sample))
        .unwrap_or(f64::MAX);

    let improved = match best {
        None => true,
        Some(b) => sample.accuracy < b.accuracy,
    };

    if improved {
        return SampleVerdict::Improved {
            distance,
            reached_target: sample.accuracy <= config.target_accuracy_m,
        };
    }

    if let Some(b) = best {
        if distance < config.stall_distance_m {
            let interval_secs = sample.seconds_since(b);
            if interval_secs > config.stall_interval_secs {
                return SampleVerdict::Stalled { interval_secs };
            }
        }
    }

    SampleVerdict::NotBetter { distance }
}

/// Location permission as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authorization {
    NotDetermined,
    Denied,
    Restricted,
    Authorized,
}

impl Authorization {
    pub fn is_blocked(self) -> bool {
        matches!(self, Authorization::Denied | Authorization::Restricted)
    }

    /// Platform code: 0 not determined, 1 restricted, 2 denied, anything else authorized.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Authorization::NotDetermined,
            1 => Authorization::Restricted,
            2 => Authorization::Denied,
            _ => Authorization::Authorized,
        }
    }
}

/// What the caller should do before starting acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preflight {
    /// Ask the OS for when-in-use permission; do not start yet
    RequestPermission,
    /// Show "Location Services Disabled"; do not start
    ServicesDisabled,
    Proceed,
}

pub fn preflight(authorization: Authorization) -> Preflight {
    match authorization {
        Authorization::NotDetermined => Preflight::RequestPermission,
        Authorization::Denied | Authorization::Restricted => Preflight::ServicesDisabled,
        Authorization::Authorized => Preflight::Proceed,
    }
}
