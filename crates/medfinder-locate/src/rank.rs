//! Great-circle distance and proximity ranking.
//!
//! Pure functions, no I/O and no shared state: safe to call from anywhere,
//! any number of times, concurrently.

use medfinder_core::{MedicineListing, Shop};

use crate::types::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Anything that can be placed on the map, maybe.
///
/// The adapter seam with the persistence layer: records with optional
/// coordinates implement this instead of being ranked duck-typed.
pub trait Rankable {
    fn coordinates(&self) -> Option<Coordinates>;
}

impl Rankable for Shop {
    fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

impl Rankable for MedicineListing {
    fn coordinates(&self) -> Option<Coordinates> {
        self.shop.coordinates()
    }
}

impl Rankable for Coordinates {
    fn coordinates(&self) -> Option<Coordinates> {
        Some(*self)
    }
}

/// An entity paired with its distance from the reference point.
///
/// `distance_km` is `None` when either side lacks coordinates; such entries
/// sort after every entry with a known distance.
#[derive(Debug, Clone)]
pub struct Ranked<'a, T> {
    pub entity: &'a T,
    pub distance_km: Option<f64>,
}

/// Great-circle distance between two points, haversine formula.
///
/// Returns ~0 for coincident points and ~20015 km for antipodal points.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);

    // Floating-point roundoff can push h a hair outside [0, 1] for antipodal
    // points, which would make the square roots NaN.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Pairs each entity with its distance from `reference` and sorts ascending.
///
/// Entities without a computable distance (no reference point, or no entity
/// coordinates) carry `None` and sort last, keeping their relative input
/// order among themselves; the sort is stable throughout. The input is not
/// mutated.
#[must_use]
pub fn rank_by_distance<T: Rankable>(
    reference: Option<Coordinates>,
    entities: &[T],
) -> Vec<Ranked<'_, T>> {
    let mut ranked: Vec<Ranked<'_, T>> = entities
        .iter()
        .map(|entity| {
            let distance_km = match (reference, entity.coordinates()) {
                (Some(from), Some(to)) => Some(haversine_km(from, to)),
                _ => None,
            };
            Ranked {
                entity,
                distance_km,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.distance_km.unwrap_or(f64::INFINITY))
    });
    ranked
}
