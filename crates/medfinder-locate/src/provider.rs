//! The device-location seam.
//!
//! A [`LocationProvider`] delivers a single current-position fix or a
//! classified failure. No retries live at this layer — retry counting and
//! user-visible messaging belong to the controller.

use std::future::Future;
use std::time::Duration;

use crate::error::DeviceFailure;
use crate::types::Coordinates;

/// Accuracy/timeout policy for a position request.
#[derive(Debug, Clone, Copy)]
pub struct LocationRequestOptions {
    /// Request the most precise fix the platform can produce.
    pub high_accuracy: bool,
    /// How long the provider may spend acquiring a fix.
    pub timeout_secs: u64,
    /// Maximum age of a reused fix, in seconds. Zero means never reuse a
    /// cached position: freshness matters more than speed for proximity
    /// ranking.
    pub maximum_age_secs: u64,
}

impl Default for LocationRequestOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_secs: 30,
            maximum_age_secs: 0,
        }
    }
}

/// Single-shot position acquisition.
pub trait LocationProvider {
    /// Requests one current-position fix.
    ///
    /// # Errors
    ///
    /// Returns a [`DeviceFailure`] classifying why no fix could be produced.
    /// [`DeviceFailure::Unsupported`] means the platform offers no location
    /// capability at all, as opposed to [`DeviceFailure::PositionUnavailable`]
    /// where the capability exists but resolution failed.
    fn request_location(
        &self,
        options: &LocationRequestOptions,
    ) -> impl Future<Output = Result<Coordinates, DeviceFailure>> + Send;
}

/// Provider for contexts without a platform location API (CLI, tests,
/// server-side tooling): serves a pre-configured fix, or reports
/// `Unsupported` when none was given.
#[derive(Debug, Clone)]
pub struct ManualLocationProvider {
    fix: Option<Coordinates>,
}

impl ManualLocationProvider {
    #[must_use]
    pub fn new(fix: Option<Coordinates>) -> Self {
        Self { fix }
    }
}

impl LocationProvider for ManualLocationProvider {
    async fn request_location(
        &self,
        options: &LocationRequestOptions,
    ) -> Result<Coordinates, DeviceFailure> {
        // No fix configured means there is no location capability here at all.
        let Some(fix) = self.fix else {
            return Err(DeviceFailure::Unsupported);
        };

        // The fix is already in hand, so the timeout is trivially honored;
        // wrapping keeps the contract observable if this ever grows real I/O.
        match tokio::time::timeout(Duration::from_secs(options.timeout_secs), async { fix }).await
        {
            Ok(coords) => Ok(coords),
            Err(_) => Err(DeviceFailure::Timeout),
        }
    }
}
