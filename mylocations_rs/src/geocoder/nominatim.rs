use super::ReverseGeocoder;
use crate::error::GeocodeError;
use crate::types::{Address, Position};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Spacing between requests to the Nominatim API
struct RateLimit {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimit {
    fn new(min_interval: Duration) -> Self {
        RateLimit {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    fn wait_time(&self) -> Duration {
        self.min_interval
            .saturating_sub(self.last_request.elapsed())
    }
}

#[derive(Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Deserialize, Default)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    pedestrian: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

impl From<NominatimAddress> for Address {
    fn from(a: NominatimAddress) -> Self {
        Address {
            house_number: a.house_number,
            street: a.road.or(a.pedestrian),
            locality: a.city.or(a.town).or(a.village).or(a.hamlet),
            region: a.state,
            postal_code: a.postcode,
            country: a.country,
        }
    }
}

/// Parse a `/reverse?format=jsonv2` body.
fn parse_reverse_response(body: &str) -> Result<Address, GeocodeError> {
    let response: ReverseResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::ParseError(e.to_string()))?;

    if let Some(msg) = response.error {
        log::debug!("Nominatim returned no result: {}", msg);
        return Err(GeocodeError::NoResult);
    }

    let address: Address = response.address.ok_or(GeocodeError::NoResult)?.into();
    if address.is_empty() {
        return Err(GeocodeError::NoResult);
    }
    Ok(address)
}

/// Reverse geocoder backed by OpenStreetMap Nominatim
///
/// # Rate Limiting
/// - At most one request per second (Nominatim usage policy)
/// - HTTP 429 is reported as `RateLimited`; the lookup is not retried
///
/// # Error Handling
/// - Network timeout: `NetworkTimeout`
/// - "Unable to geocode" or empty address: `NoResult`
/// - Unparseable body: `ParseError`
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    rate_limit: Arc<Mutex<RateLimit>>,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("MyLocations/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        NominatimGeocoder {
            client,
            base_url: base_url.to_string(),
            rate_limit: Arc::new(Mutex::new(RateLimit::new(Duration::from_secs(1)))),
        }
    }

    fn request_url(&self, position: &Position) -> String {
        format!(
            "{}?format=jsonv2&addressdetails=1&zoom=18&lat={:.7}&lon={:.7}",
            self.base_url, position.latitude, position.longitude
        )
    }

    pub async fn reverse(&self, position: Position) -> Result<Address, GeocodeError> {
        {
            let mut limit = self.rate_limit.lock().await;
            let wait = limit.wait_time();
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
            limit.last_request = Instant::now();
        }

        let response = self
            .client
            .get(self.request_url(&position))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeError::NetworkTimeout
                } else {
                    GeocodeError::Other(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            log::warn!("Rate limited by Nominatim");
            return Err(GeocodeError::RateLimited);
        } else if !status.is_success() {
            return Err(GeocodeError::HttpError(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::Other(format!("Failed to read response: {}", e)))?;

        parse_reverse_response(&body)
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    fn lookup(&self, position: Position) -> BoxFuture<'static, Result<Address, GeocodeError>> {
        let geocoder = self.clone();
        async move { geocoder.reverse(position).await }.boxed()
    }
}
