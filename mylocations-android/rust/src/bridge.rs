//! Conversions between JNI primitives / JSON strings and core types.

use crate::error::{BridgeError, JResult};
use mylocations_rs::acquisition::SessionToken;
use mylocations_rs::{AcquisitionConfig, Address, Effect, GeocodeError, Position};

/// Location from Android's `Location` callback
pub fn location_from_jni(
    latitude: f64,
    longitude: f64,
    accuracy: f64,
    timestamp_secs: f64,
    age_secs: f64,
) -> JResult<Position> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(BridgeError::InvalidParameters(format!(
            "latitude {} out of range",
            latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(BridgeError::InvalidParameters(format!(
            "longitude {} out of range",
            longitude
        )));
    }
    if !timestamp_secs.is_finite() {
        return Err(BridgeError::InvalidParameters(
            "timestamp is not finite".to_string(),
        ));
    }

    // Android reports "no accuracy" as 0.0 with hasAccuracy() false; the
    // Kotlin side passes -1 for that case, which the policy rejects.
    let accuracy = if accuracy.is_finite() { accuracy } else { -1.0 };
    let age_secs = if age_secs.is_finite() { age_secs.max(0.0) } else { 0.0 };

    Ok(Position::new(latitude, longitude, accuracy, timestamp_secs).with_age(age_secs))
}

pub fn token_from_jni(token: i64) -> JResult<SessionToken> {
    u64::try_from(token)
        .map(SessionToken)
        .map_err(|_| BridgeError::InvalidParameters(format!("invalid session token {}", token)))
}

pub fn request_from_jni(request: i64) -> JResult<u64> {
    u64::try_from(request)
        .map_err(|_| BridgeError::InvalidParameters(format!("invalid geocode request {}", request)))
}

pub fn config_from_json(json: &str) -> JResult<AcquisitionConfig> {
    serde_json::from_str(json)
        .map_err(|e| BridgeError::InvalidParameters(format!("config: {}", e)))
}

/// Android `Address` fields serialized by the Kotlin side.
pub fn address_from_json(json: &str) -> JResult<Address> {
    serde_json::from_str(json)
        .map_err(|e| BridgeError::InvalidParameters(format!("address: {}", e)))
}

/// Geocoder exception message from Kotlin. An empty list of results arrives
/// as an empty message.
pub fn geocode_error_from_message(message: &str) -> GeocodeError {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        GeocodeError::NoResult
    } else if trimmed.to_ascii_lowercase().contains("timed out") {
        GeocodeError::NetworkTimeout
    } else {
        GeocodeError::Other(trimmed.to_string())
    }
}

pub fn effects_to_json(effects: &[Effect]) -> JResult<String> {
    serde_json::to_string(effects)
        .map_err(|_| BridgeError::Internal("JSON serialization failed".to_string()))
}
