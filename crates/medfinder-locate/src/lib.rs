//! Location resolution and proximity ranking for medicine/pharmacy discovery.
//!
//! The pipeline: a [`provider::LocationProvider`] captures a device fix, the
//! [`geocode::ReverseGeocoder`] turns it into an area/pincode pair (degrading
//! gracefully when it can't), the [`controller::LocationController`] owns the
//! request state machine and retry accounting, and [`rank`] orders shops by
//! great-circle distance from the resolved point.

pub mod controller;
pub mod error;
pub mod geocode;
pub mod provider;
pub mod rank;
pub mod retry;
pub mod session;
pub mod types;

pub use controller::{LocationController, LocationSnapshot, RefreshOutcome};
pub use error::{DeviceFailure, GeocodeError};
pub use geocode::{AreaSummary, ReverseGeocoder};
pub use provider::{LocationProvider, LocationRequestOptions, ManualLocationProvider};
pub use rank::{haversine_km, rank_by_distance, Rankable, Ranked};
pub use retry::RetryPolicy;
pub use session::{CachedLocation, MemorySessionStore, SessionStore};
pub use types::{
    Coordinates, LocationRequestState, RequestStatus, ResolvedLocation, UNKNOWN_AREA,
    UNKNOWN_PINCODE,
};
