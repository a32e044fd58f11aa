//! Shop and medicine records at the boundary with the persistence layer.
//!
//! These are the records the (external) catalog backend hands us. Coordinates
//! are optional throughout: shop owners register stores without pinning them
//! on a map, and ranking has to tolerate that.

use serde::{Deserialize, Serialize};

/// A registered pharmacy/store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Owner-supplied maps link, preferred over a synthesized one.
    pub maps_link: Option<String>,
}

impl Shop {
    /// Returns a maps URL for this shop: the owner-supplied link if present,
    /// otherwise a Google Maps query synthesized from coordinates.
    ///
    /// Returns `None` when the shop has neither a link nor coordinates.
    #[must_use]
    pub fn maps_url(&self) -> Option<String> {
        if let Some(link) = &self.maps_link {
            return Some(link.clone());
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(format!("https://www.google.com/maps?q={lat},{lon}")),
            _ => None,
        }
    }
}

/// A medicine search hit: the medicine plus the shop stocking it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineListing {
    pub name: String,
    pub price: f64,
    pub stock_quantity: u32,
    pub shop: Shop,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop(latitude: Option<f64>, longitude: Option<f64>, maps_link: Option<&str>) -> Shop {
        Shop {
            id: 1,
            name: "City Pharmacy".to_string(),
            address: "12 MG Road".to_string(),
            phone: None,
            latitude,
            longitude,
            maps_link: maps_link.map(str::to_string),
        }
    }

    #[test]
    fn maps_url_prefers_explicit_link() {
        let s = shop(
            Some(12.97),
            Some(77.59),
            Some("https://maps.example.com/abc"),
        );
        assert_eq!(s.maps_url().as_deref(), Some("https://maps.example.com/abc"));
    }

    #[test]
    fn maps_url_synthesized_from_coordinates() {
        let s = shop(Some(12.9716), Some(77.5946), None);
        assert_eq!(
            s.maps_url().as_deref(),
            Some("https://www.google.com/maps?q=12.9716,77.5946")
        );
    }

    #[test]
    fn maps_url_none_without_link_or_coordinates() {
        assert_eq!(shop(None, None, None).maps_url(), None);
        assert_eq!(shop(Some(12.97), None, None).maps_url(), None);
    }

    #[test]
    fn shop_round_trips_through_json() {
        let s = shop(Some(12.97), Some(77.59), None);
        let json = serde_json::to_string(&s).unwrap();
        let back: Shop = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "City Pharmacy");
        assert_eq!(back.latitude, Some(12.97));
    }
}
