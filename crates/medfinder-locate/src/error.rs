use thiserror::Error;

/// Classified failure from the device location layer.
///
/// The `Display` text is the user-facing message for each failure kind.
/// A `DeviceFailure` is terminal for the current request: no partial
/// location is produced, and the controller increments its retry counter
/// (except for [`DeviceFailure::Unsupported`], where retrying cannot help).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceFailure {
    #[error("location permission denied. Please enable location access in your device settings")]
    PermissionDenied,

    #[error("location information is unavailable. Please try again")]
    PositionUnavailable,

    #[error("location request timed out. Please try again")]
    Timeout,

    #[error("location services are not available on this device")]
    Unsupported,
}

/// Failure from the reverse-geocoding call.
///
/// Never fatal to a location request: the controller recovers by degrading
/// to a coordinates-only [`ResolvedLocation`](crate::types::ResolvedLocation).
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error calling reverse geocoder: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("reverse geocoder response could not be parsed: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("reverse geocoder response has no address data")]
    MissingAddress,
}
