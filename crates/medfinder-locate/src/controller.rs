//! The stateful orchestrator over the provider and geocoder layers.
//!
//! Owns the request state machine, the retry policy, and the current
//! resolved location. Recovery policy: a device failure is terminal for the
//! request (Failed, counter bumped, stale location preserved); a geocoding
//! failure is cosmetic (Resolved with sentinels and real coordinates,
//! counter untouched).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;

use medfinder_core::AppConfig;

use crate::error::{DeviceFailure, GeocodeError};
use crate::geocode::ReverseGeocoder;
use crate::provider::{LocationProvider, LocationRequestOptions};
use crate::retry::RetryPolicy;
use crate::session::{CachedLocation, SessionStore};
use crate::types::{Coordinates, LocationRequestState, RequestStatus, ResolvedLocation};

/// Informational note recorded when geocoding fails but the fix survives.
const DEGRADED_NOTE: &str = "Could not get your precise location details. Using coordinates only.";

/// A point-in-time view of the controller.
#[derive(Debug, Clone)]
pub struct LocationSnapshot {
    pub status: RequestStatus,
    pub retry_count: u32,
    pub error_message: Option<String>,
    pub location: Option<ResolvedLocation>,
}

impl LocationSnapshot {
    /// Observable request state without the location payload.
    #[must_use]
    pub fn request_state(&self) -> LocationRequestState {
        LocationRequestState {
            status: self.status,
            retry_count: self.retry_count,
            error_message: self.error_message.clone(),
        }
    }
}

/// Result of a [`LocationController::refresh`] call.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The request ran to completion (Resolved or Failed).
    Completed(LocationSnapshot),
    /// Another request was already in flight; nothing was started.
    AlreadyInFlight,
}

struct ControllerState {
    request: LocationRequestState,
    location: Option<ResolvedLocation>,
    retry: RetryPolicy,
}

/// Orchestrates device fix acquisition and reverse geocoding.
///
/// Shareable (`Arc`) for event-driven callers; concurrent `refresh()` calls
/// follow the ignore-while-loading policy, so two device requests can never
/// run at once and a late completion can never clobber a newer one.
pub struct LocationController<P> {
    provider: P,
    geocoder: ReverseGeocoder,
    options: LocationRequestOptions,
    session: Arc<dyn SessionStore + Send + Sync>,
    state: Mutex<ControllerState>,
    in_flight: tokio::sync::Mutex<()>,
}

impl<P: LocationProvider> LocationController<P> {
    /// Creates a controller, restoring the last session-cached location (if
    /// any) as the initial stale value. Status starts at Idle either way.
    pub fn new(
        provider: P,
        geocoder: ReverseGeocoder,
        options: LocationRequestOptions,
        retry: RetryPolicy,
        session: Arc<dyn SessionStore + Send + Sync>,
    ) -> Self {
        let location = session.get().map(|cached| cached.location);
        Self {
            provider,
            geocoder,
            options,
            session,
            state: Mutex::new(ControllerState {
                request: LocationRequestState::idle(),
                location,
                retry,
            }),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Creates a controller wired from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the geocoding client cannot be
    /// constructed.
    pub fn from_config(
        provider: P,
        config: &AppConfig,
        session: Arc<dyn SessionStore + Send + Sync>,
    ) -> Result<Self, GeocodeError> {
        let geocoder = ReverseGeocoder::new(config)?;
        let options = LocationRequestOptions {
            high_accuracy: true,
            timeout_secs: config.device_timeout_secs,
            maximum_age_secs: 0,
        };
        let retry = RetryPolicy::new(config.max_retry_attempts, config.retry_base_delay_ms);
        Ok(Self::new(provider, geocoder, options, retry, session))
    }

    /// Runs one full location request: device fix, then reverse geocoding.
    ///
    /// Returns [`RefreshOutcome::AlreadyInFlight`] without touching anything
    /// when a request is already running. Otherwise the machine moves
    /// Loading → Resolved (possibly degraded) or Loading → Failed, and the
    /// resulting snapshot is returned. There is no terminal state; the
    /// controller is always refreshable.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("location refresh ignored: a request is already in flight");
            return RefreshOutcome::AlreadyInFlight;
        };

        {
            let mut state = self.lock_state();
            state.request.status = RequestStatus::Loading;
            state.request.error_message = None;
        }

        match self.provider.request_location(&self.options).await {
            Ok(coords) => self.resolve_fix(coords).await,
            Err(failure) => self.record_device_failure(failure),
        }

        RefreshOutcome::Completed(self.snapshot())
    }

    async fn resolve_fix(&self, coords: Coordinates) {
        let (location, note) = match self.geocoder.resolve(coords).await {
            Ok(summary) => (
                ResolvedLocation::new(summary.area, summary.pincode, coords),
                None,
            ),
            Err(err) => {
                // Geocoding failure is cosmetic: keep the fix, flag the loss
                // of detail, do not touch the retry counter.
                tracing::warn!(error = %err, "reverse geocoding failed; degrading to coordinates");
                (
                    ResolvedLocation::degraded(coords),
                    Some(DEGRADED_NOTE.to_string()),
                )
            }
        };

        self.session.set(CachedLocation {
            location: location.clone(),
            cached_at: Utc::now(),
        });

        let mut state = self.lock_state();
        state.retry.reset();
        state.request.status = RequestStatus::Resolved;
        state.request.retry_count = 0;
        state.request.error_message = note;
        state.location = Some(location);
    }

    fn record_device_failure(&self, failure: DeviceFailure) {
        tracing::warn!(%failure, "device location request failed");
        let mut state = self.lock_state();
        state.request.status = RequestStatus::Failed;
        state.request.error_message = Some(failure.to_string());
        // Unsupported means no capability exists; retrying cannot help, so
        // the counter (and with it the retry hint) stays put.
        if failure != DeviceFailure::Unsupported {
            state.request.retry_count = state.retry.record_failure();
        }
        // state.location is deliberately left alone: the last-known value
        // stays visible while the user decides whether to retry.
    }

    /// Current state and location.
    #[must_use]
    pub fn snapshot(&self) -> LocationSnapshot {
        let state = self.lock_state();
        LocationSnapshot {
            status: state.request.status,
            retry_count: state.request.retry_count,
            error_message: state.request.error_message.clone(),
            location: state.location.clone(),
        }
    }

    /// The current resolved location, if any request ever succeeded (or a
    /// session-cached value was restored).
    #[must_use]
    pub fn location(&self) -> Option<ResolvedLocation> {
        self.lock_state().location.clone()
    }

    /// Suggested wait before the next manual retry, from the retry policy.
    #[must_use]
    pub fn next_retry_delay(&self) -> Option<Duration> {
        self.lock_state().retry.next_delay()
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
