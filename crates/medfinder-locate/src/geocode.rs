//! Reverse-geocoding client.
//!
//! Converts a device fix into a best-effort area/pincode pair by querying a
//! Nominatim-compatible `/reverse` endpoint. Area extraction walks an ordered
//! fallback chain from the most specific named subdivision down to the first
//! segment of the display name. One request per endpoint, one outcome — retry
//! policy lives with the controller, not here.

use serde::Deserialize;

use medfinder_core::AppConfig;

use crate::error::GeocodeError;
use crate::types::{Coordinates, UNKNOWN_AREA, UNKNOWN_PINCODE};

/// The extracted human-readable fragment of a resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaSummary {
    pub area: String,
    pub pincode: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
    display_name: Option<String>,
}

/// Structured address detail, decreasing specificity top to bottom.
#[derive(Debug, Deserialize)]
struct Address {
    suburb: Option<String>,
    neighbourhood: Option<String>,
    residential: Option<String>,
    village: Option<String>,
    town: Option<String>,
    city_district: Option<String>,
    city: Option<String>,
    county: Option<String>,
    postcode: Option<String>,
}

#[derive(Debug, Clone)]
struct FallbackEndpoint {
    base_url: String,
    api_key: Option<String>,
}

/// Client for Nominatim-compatible reverse geocoding.
///
/// Use [`ReverseGeocoder::new`] for production or
/// [`ReverseGeocoder::with_base_url`] to point at a mock server in tests.
/// An optional key-gated fallback endpoint can be attached; it is tried once
/// when the primary attempt fails and is never assumed to be available.
pub struct ReverseGeocoder {
    client: reqwest::Client,
    base_url: String,
    fallback: Option<FallbackEndpoint>,
}

impl ReverseGeocoder {
    /// Creates a geocoder from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, GeocodeError> {
        let mut geocoder = Self::with_base_url(
            &config.geocoder_base_url,
            config.geocoder_timeout_secs,
            &config.user_agent,
        )?;
        if let Some(url) = &config.geocoder_fallback_url {
            geocoder = geocoder.with_fallback(url, config.geocoder_fallback_api_key.as_deref());
        }
        Ok(geocoder)
    }

    /// Creates a geocoder with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            fallback: None,
        })
    }

    /// Attaches a key-gated fallback endpoint, tried once when the primary
    /// attempt fails.
    #[must_use]
    pub fn with_fallback(mut self, base_url: &str, api_key: Option<&str>) -> Self {
        self.fallback = Some(FallbackEndpoint {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        });
        self
    }

    /// Resolves a device fix into an area/pincode pair.
    ///
    /// Fallback-field exhaustion is still a success (sentinel values); only
    /// transport problems and structurally unusable responses are errors, so
    /// the caller can degrade to coordinates instead of losing the fix.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::Status`] on a non-2xx response.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected shape.
    /// - [`GeocodeError::MissingAddress`] if the body lacks an `address` object.
    pub async fn resolve(&self, coords: Coordinates) -> Result<AreaSummary, GeocodeError> {
        let primary = self.request_reverse(&self.base_url, None, coords).await;

        let err = match primary {
            Ok(summary) => return Ok(summary),
            Err(err) => err,
        };

        let Some(fallback) = &self.fallback else {
            return Err(err);
        };

        tracing::warn!(
            error = %err,
            fallback_url = fallback.base_url,
            "primary reverse geocoder failed; trying fallback endpoint"
        );
        self.request_reverse(&fallback.base_url, fallback.api_key.as_deref(), coords)
            .await
    }

    async fn request_reverse(
        &self,
        base_url: &str,
        api_key: Option<&str>,
        coords: Coordinates,
    ) -> Result<AreaSummary, GeocodeError> {
        let url = format!("{base_url}/reverse");
        let mut params = vec![
            ("format", "json".to_string()),
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("addressdetails", "1".to_string()),
            ("zoom", "18".to_string()),
            ("accept-language", "en".to_string()),
        ];
        if let Some(key) = api_key {
            params.push(("key", key.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.json::<serde_json::Value>().await?;
        let parsed: ReverseResponse = serde_json::from_value(body)?;

        let Some(address) = parsed.address else {
            return Err(GeocodeError::MissingAddress);
        };

        let summary = summarize(&address, parsed.display_name.as_deref());
        tracing::debug!(
            lat = coords.latitude,
            lon = coords.longitude,
            area = summary.area,
            pincode = summary.pincode,
            "reverse geocoded device fix"
        );
        Ok(summary)
    }
}

fn summarize(address: &Address, display_name: Option<&str>) -> AreaSummary {
    let area = extract_area(address, display_name).unwrap_or_else(|| UNKNOWN_AREA.to_string());
    let pincode = address
        .postcode
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map_or_else(|| UNKNOWN_PINCODE.to_string(), str::to_string);
    AreaSummary { area, pincode }
}

/// Walks the fallback chain from most to least specific; first non-empty wins.
/// The ordering prefers the smallest named subdivision a user would recognize.
fn extract_area(address: &Address, display_name: Option<&str>) -> Option<String> {
    let chain = [
        &address.suburb,
        &address.neighbourhood,
        &address.residential,
        &address.village,
        &address.town,
        &address.city_district,
        &address.city,
        &address.county,
    ];

    for field in chain {
        if let Some(value) = field {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    display_name
        .and_then(|name| name.split(',').next())
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
