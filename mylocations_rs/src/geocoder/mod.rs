pub mod nominatim;
pub mod scripted;

pub use nominatim::NominatimGeocoder;
pub use scripted::{GeocodeScript, ScriptedGeocoder};

use crate::error::GeocodeError;
use crate::types::{Address, Position};
use futures::future::BoxFuture;

/// Resolves coordinates to a placemark. Each call completes exactly once.
pub trait ReverseGeocoder: Send + Sync + 'static {
    fn lookup(&self, position: Position) -> BoxFuture<'static, Result<Address, GeocodeError>>;
}
