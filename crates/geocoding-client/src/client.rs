use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::address::{format_address, pick_best, sanitize_line};
use crate::error::GeocodingError;
use crate::types::GeocodeResponse;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const DEFAULT_LANGUAGE: &str = "es";
const RESULT_TYPES: &str = "route|street_address";

pub const ADDRESS_NOT_FOUND: &str = "Dirección no encontrada";
pub const ADDRESS_LOOKUP_FAILED: &str = "No se pudo obtener la dirección";
pub const ADDRESS_UNAVAILABLE: &str = "Dirección no disponible";

/// A reverse geocoding provider
pub trait GeocodeTransport: Send + Sync {
    fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = crate::Result<GeocodeResponse>> + Send;
}

/// Google Geocoding API transport
pub struct GoogleGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl GoogleGeocoder {
    /// Create a transport against the public Google endpoint
    pub fn new(api_key: &str) -> crate::Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, DEFAULT_LANGUAGE)
    }

    /// Create a transport with a custom endpoint and result language
    pub fn with_base_url(base_url: &str, api_key: &str, language: &str) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            language: language.to_string(),
        })
    }

    fn build_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?latlng={},{}&result_type={}&language={}&key={}",
            self.base_url,
            latitude,
            longitude,
            urlencoding::encode(RESULT_TYPES),
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.api_key)
        )
    }
}

impl GeocodeTransport for GoogleGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> crate::Result<GeocodeResponse> {
        let url = self.build_url(latitude, longitude);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodingError::ApiError(format!(
                "Geocoding API returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Turns coordinates into one human readable address line.
///
/// Never fails: provider errors and empty answers become fixed
/// Spanish fallback strings so callers can show the result directly.
pub struct AddressResolver<T> {
    transport: T,
}

impl<T: GeocodeTransport> AddressResolver<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub async fn resolve(&self, latitude: f64, longitude: f64) -> String {
        match self.try_resolve(latitude, longitude).await {
            Ok(line) => {
                debug!(lat = latitude, lon = longitude, address = %line, "Resolved address");
                line
            }
            Err(e) => {
                warn!(lat = latitude, lon = longitude, error = %e, "Address lookup failed");
                ADDRESS_LOOKUP_FAILED.to_string()
            }
        }
    }

    async fn try_resolve(&self, latitude: f64, longitude: f64) -> crate::Result<String> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeocodingError::InvalidCoordinates(latitude, longitude));
        }

        let data = self.transport.reverse(latitude, longitude).await?;

        if !matches!(data.status.as_str(), "" | "OK" | "ZERO_RESULTS") {
            warn!(lat = latitude, lon = longitude, status = %data.status, "Geocoding API status");
        }

        let Some(best) = pick_best(&data.results) else {
            return Ok(ADDRESS_NOT_FOUND.to_string());
        };

        let formatted = format_address(best);
        let line = if !formatted.is_empty() {
            formatted
        } else {
            best.formatted_address
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| ADDRESS_UNAVAILABLE.to_string())
        };

        Ok(sanitize_line(&line))
    }
}
