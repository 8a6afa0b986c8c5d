use super::ReverseGeocoder;
use crate::error::GeocodeError;
use crate::types::{duration_from_secs, Address, Position};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::sleep;

/// Canned geocoder answer, as written in a scenario file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GeocodeScript {
    #[serde(default)]
    pub delay_secs: f64,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub error: Option<GeocodeError>,
}

/// Answers every lookup with the same script after a delay.
#[derive(Clone)]
pub struct ScriptedGeocoder {
    script: GeocodeScript,
    time_scale: f64,
    lookups: Arc<AtomicU64>,
}

impl ScriptedGeocoder {
    pub fn new(script: GeocodeScript) -> Self {
        Self {
            script,
            time_scale: 1.0,
            lookups: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Divide the scripted delay by `scale` (2.0 = twice as fast).
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        if scale > 0.0 {
            self.time_scale = scale;
        }
        self
    }

    /// Number of lookups issued so far
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl ReverseGeocoder for ScriptedGeocoder {
    fn lookup(&self, position: Position) -> BoxFuture<'static, Result<Address, GeocodeError>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let script = self.script.clone();
        let delay = duration_from_secs(script.delay_secs / self.time_scale);

        async move {
            sleep(delay).await;
            log::debug!(
                "Scripted lookup for {:.6},{:.6}",
                position.latitude,
                position.longitude
            );
            if let Some(err) = script.error {
                return Err(err);
            }
            script.address.ok_or(GeocodeError::NoResult)
        }
        .boxed()
    }
}
