pub mod address;

pub use address::Address;

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single fix reported by the position source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters (negative = invalid reading)
    pub accuracy: f64,
    /// Seconds since epoch at which the fix was computed
    pub timestamp: f64,
    /// Seconds between fix computation and delivery, as reported by the source
    #[serde(default)]
    pub age_secs: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64, timestamp: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp,
            age_secs: 0.0,
        }
    }

    pub fn with_age(mut self, age_secs: f64) -> Self {
        self.age_secs = age_secs;
        self
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.point().haversine_distance(&other.point())
    }

    /// Seconds elapsed from `earlier` to this fix (by fix timestamp, not delivery).
    pub fn seconds_since(&self, earlier: &Position) -> f64 {
        self.timestamp - earlier.timestamp
    }

    pub fn has_valid_accuracy(&self) -> bool {
        self.accuracy >= 0.0
    }

    fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Coordinate rendered the way the capture screen shows it.
pub fn format_coordinate(value: f64) -> String {
    format!("{:.8}", value)
}

/// Seconds as a `Duration`. Negative and NaN become zero, values past
/// `Duration::MAX` saturate.
pub fn duration_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or_else(|_| {
        log::warn!("{} s does not fit in a Duration, saturating", secs);
        Duration::MAX
    })
}
