use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the position source
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LocationError {
    /// No fix yet; the source keeps trying
    #[error("Location unknown")]
    LocationUnknown,

    #[error("Location access denied")]
    Denied,

    #[error("Location network unavailable")]
    Network,

    #[error("Location hardware failure: {0}")]
    Hardware(String),

    #[error("Location error: {0}")]
    Other(String),
}

impl LocationError {
    /// Transient errors are swallowed while acquiring.
    pub fn is_transient(&self) -> bool {
        matches!(self, LocationError::LocationUnknown)
    }

    /// Map a platform error code (0 = unknown, 1 = denied, 2 = network).
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => LocationError::LocationUnknown,
            1 => LocationError::Denied,
            2 => LocationError::Network,
            other => LocationError::Other(format!("code {}", other)),
        }
    }
}

/// Session-fatal outcomes
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AcquisitionError {
    #[error("Timed out waiting for a location fix")]
    TimedOut,

    #[error(transparent)]
    Position(#[from] LocationError),
}

impl AcquisitionError {
    pub fn is_denied(&self) -> bool {
        matches!(self, AcquisitionError::Position(LocationError::Denied))
    }
}

/// Reverse geocoding failures. Never fatal to a session.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GeocodeError {
    #[error("No address found")]
    NoResult,

    #[error("Geocoder network timeout")]
    NetworkTimeout,

    #[error("Geocoder HTTP error: {0}")]
    HttpError(u16),

    #[error("Rate limited by geocoder")]
    RateLimited,

    #[error("Geocoder parse error: {0}")]
    ParseError(String),

    #[error("Geocoder error: {0}")]
    Other(String),
}

/// Rejected acquisition tuning
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("target_accuracy_m must be greater than zero")]
    ZeroTargetAccuracy,
}

/// Misuse of controller commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Acquisition already running")]
    AlreadyRunning,
}
