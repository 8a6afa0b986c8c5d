use crate::error::AcquisitionError;
use crate::types::{Address, Position};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What the capture screen should be telling the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// Nothing running; prompt to start
    Idle,
    Searching,
    LocationServicesDisabled,
    ErrorGettingLocation,
}

impl StatusClass {
    pub fn message(self) -> &'static str {
        match self {
            StatusClass::Idle => "Tap 'Get My Location' to Start",
            StatusClass::Searching => "Searching...",
            StatusClass::LocationServicesDisabled => "Location Services Disabled",
            StatusClass::ErrorGettingLocation => "Error Getting Location",
        }
    }
}

/// Pick the classification. A fatal error wins, then a blocked authorization,
/// then whether a subscription is open.
pub fn classify(
    last_error: Option<&AcquisitionError>,
    services_blocked: bool,
    acquiring: bool,
) -> StatusClass {
    match last_error {
        Some(err) if err.is_denied() => StatusClass::LocationServicesDisabled,
        Some(_) => StatusClass::ErrorGettingLocation,
        None if services_blocked => StatusClass::LocationServicesDisabled,
        None if acquiring => StatusClass::Searching,
        None => StatusClass::Idle,
    }
}

/// Published view of the session. Observers only ever read this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub position: Option<Position>,
    pub address: Option<Address>,
    pub acquiring: bool,
    /// A reverse geocode is in flight
    pub geocoding: bool,
    /// The last reverse geocode failed
    pub geocode_failed: bool,
    pub status: StatusClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AcquisitionError>,
}

impl StatusSnapshot {
    /// Address line for the capture screen.
    pub fn address_label(&self) -> String {
        match (&self.address, self.geocoding, self.geocode_failed) {
            (Some(addr), _, _) => addr.summary(),
            (None, true, _) => "Searching for Address...".to_string(),
            (None, false, true) => "Error Finding Address".to_string(),
            (None, false, false) => {
                if self.position.is_some() {
                    "No Address Found".to_string()
                } else {
                    String::new()
                }
            }
        }
    }
}

/// Why a session ended successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixReason {
    TargetReached,
    /// Best-effort fix; the device stopped improving
    Stalled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Success { position: Position, reason: FixReason },
    Failure { cause: AcquisitionError },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Status(StatusSnapshot),
    Finished(Outcome),
}

/// Final report written by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixReport {
    pub generated_at: String,
    pub snapshot: StatusSnapshot,
    pub outcome: Option<Outcome>,
}

impl FixReport {
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
