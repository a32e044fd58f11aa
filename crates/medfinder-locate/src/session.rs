//! Injectable session storage for the resolved-location cache.
//!
//! The controller never touches ambient global state; it writes the latest
//! resolved location through whatever store the caller injects. The in-memory
//! store covers tests and one-shot CLI runs; an application embedding the
//! module can supply a persistent implementation.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ResolvedLocation;

/// A cached resolved location plus when it was stored.
///
/// The timestamp is for callers judging staleness of the *display* value;
/// the device layer itself never reuses a cached fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLocation {
    pub location: ResolvedLocation,
    pub cached_at: DateTime<Utc>,
}

/// Minimal get/set/clear session storage.
pub trait SessionStore {
    fn get(&self) -> Option<CachedLocation>;
    fn set(&self, cached: CachedLocation);
    fn clear(&self);
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<CachedLocation>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<CachedLocation> {
        self.slot.lock().map(|guard| guard.clone()).unwrap_or(None)
    }

    fn set(&self, cached: CachedLocation) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = Some(cached);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = None;
        }
    }
}
