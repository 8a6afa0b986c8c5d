// MyLocations fix acquisition core
// Decides when a stream of noisy GPS fixes is good enough, and keeps the
// reverse geocode in step with the fix it describes.

pub mod acquisition;
pub mod error;
pub mod geocoder;
pub mod runner;
pub mod sources;
pub mod types;

pub use acquisition::{
    AcquisitionConfig, Authorization, Effect, Event, FixController, Notification, Outcome,
    StatusClass, StatusSnapshot,
};
pub use error::{AcquisitionError, ConfigError, ControllerError, GeocodeError, LocationError};
pub use runner::{FixRunner, PositionSink, PositionSource, RunnerHandle};
pub use types::{Address, Position};
