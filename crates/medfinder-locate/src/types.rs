//! Domain types for location resolution.

use serde::{Deserialize, Serialize};

/// Sentinel area name used when reverse geocoding fails or yields no usable field.
pub const UNKNOWN_AREA: &str = "Unknown Area";
/// Sentinel pincode used when reverse geocoding fails or yields no usable field.
pub const UNKNOWN_PINCODE: &str = "Unknown Pincode";

/// A device position fix in decimal degrees (WGS84).
///
/// Produced only by a [`LocationProvider`](crate::provider::LocationProvider);
/// immutable once captured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The display-ready location produced by combining a device fix with
/// (possibly degraded) reverse geocoding.
///
/// `latitude`/`longitude` are always carried over from the original device
/// reading even when geocoding fails entirely — the raw fix is never
/// discarded because the reverse lookup failed. Replaced wholesale on every
/// refresh, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub area: String,
    pub pincode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ResolvedLocation {
    #[must_use]
    pub fn new(area: String, pincode: String, coords: Coordinates) -> Self {
        Self {
            area,
            pincode,
            latitude: Some(coords.latitude),
            longitude: Some(coords.longitude),
        }
    }

    /// A coordinates-only location: geocoding failed but the device fix is
    /// still usable for distance ranking.
    #[must_use]
    pub fn degraded(coords: Coordinates) -> Self {
        Self::new(UNKNOWN_AREA.to_string(), UNKNOWN_PINCODE.to_string(), coords)
    }

    /// The reference point for distance ranking, if both fields are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Where a location request currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Resolved,
    Failed,
}

/// Observable state of the current location request.
///
/// `retry_count` increments only on device-level failure (permission denial,
/// timeout, position unavailable) — a geocoding failure degrades the resolved
/// location instead of failing the request. It resets to 0 on any resolved
/// state. `error_message` carries the device-failure classification on
/// `Failed`, or the informational degraded-geocoding note on `Resolved`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRequestState {
    pub status: RequestStatus,
    pub retry_count: u32,
    pub error_message: Option<String>,
}

impl LocationRequestState {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            status: RequestStatus::Idle,
            retry_count: 0,
            error_message: None,
        }
    }

    /// An extra nudge shown after repeated device failures.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        if self.status == RequestStatus::Failed && self.retry_count > 0 {
            Some("If this keeps happening, check your location permissions and refresh.")
        } else {
            None
        }
    }
}
