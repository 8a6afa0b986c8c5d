use crate::error::{BridgeError, JResult};
use mylocations_rs::acquisition::{preflight, Preflight, SessionToken};
use mylocations_rs::{
    AcquisitionConfig, Address, Authorization, Effect, FixController, GeocodeError,
    LocationError, Position, StatusSnapshot,
};
use std::sync::Mutex;

/// Controller shared by all JNI entry points.
///
/// Android delivers location, geocoder and timer callbacks on different
/// threads; the mutex serializes them so the controller sees one event at a
/// time.
pub struct FixSession {
    controller: Mutex<FixController>,
}

impl FixSession {
    pub fn new() -> Self {
        FixSession {
            controller: Mutex::new(FixController::default()),
        }
    }

    fn with_controller<T>(&self, f: impl FnOnce(&mut FixController) -> T) -> JResult<T> {
        let mut controller = self.controller.lock().map_err(|_| {
            BridgeError::Internal("Failed to acquire controller lock".to_string())
        })?;
        Ok(f(&mut controller))
    }

    /// Replace tuning. Not allowed mid-acquisition.
    pub fn configure(&self, config: AcquisitionConfig) -> JResult<()> {
        config
            .validate()
            .map_err(|e| BridgeError::InvalidParameters(format!("config: {}", e)))?;
        self.with_controller(|c| {
            if c.is_acquiring() {
                return Err(BridgeError::InvalidState(
                    "Cannot reconfigure while acquiring".to_string(),
                ));
            }
            c.set_config(config);
            Ok(())
        })?
    }

    pub fn set_authorization(&self, authorization: Authorization) -> JResult<Vec<Effect>> {
        self.with_controller(|c| c.on_authorization(authorization))
    }

    /// Start acquisition once permission allows it (Idle/Done → Acquiring)
    pub fn start(&self) -> JResult<Vec<Effect>> {
        self.with_controller(|c| {
            let authorization = c.authorization().unwrap_or(Authorization::NotDetermined);
            match preflight(authorization) {
                Preflight::RequestPermission => Err(BridgeError::PermissionRequired),
                Preflight::ServicesDisabled => Err(BridgeError::ServicesDisabled),
                Preflight::Proceed => Ok(c.start()?),
            }
        })?
    }

    pub fn stop(&self) -> JResult<Vec<Effect>> {
        self.with_controller(|c| c.stop())
    }

    pub fn push_location(&self, token: SessionToken, position: Position) -> JResult<Vec<Effect>> {
        self.with_controller(|c| c.on_sample(token, position))
    }

    pub fn push_location_error(
        &self,
        token: SessionToken,
        error: LocationError,
    ) -> JResult<Vec<Effect>> {
        self.with_controller(|c| c.on_sample_error(token, error))
    }

    pub fn timer_fired(&self, token: SessionToken) -> JResult<Vec<Effect>> {
        self.with_controller(|c| c.on_timeout(token))
    }

    pub fn geocode_completed(
        &self,
        token: SessionToken,
        request: u64,
        result: Result<Address, GeocodeError>,
    ) -> JResult<Vec<Effect>> {
        self.with_controller(|c| c.on_geocode_completed(token, request, result))
    }

    pub fn snapshot(&self) -> JResult<StatusSnapshot> {
        self.with_controller(|c| c.snapshot())
    }

    pub fn is_acquiring(&self) -> JResult<bool> {
        self.with_controller(|c| c.is_acquiring())
    }
}

impl Default for FixSession {
    fn default() -> Self {
        Self::new()
    }
}
