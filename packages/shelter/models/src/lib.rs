#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core data model for the shelter proximity engine.
//!
//! These types are shared across the whole workspace: the store
//! serializes [`ShelterRecord`] to and from the backend, the distance
//! engine ranks them, and the search service assembles them into a
//! [`SearchResults`] for callers.

use serde::{Deserialize, Serialize};

/// A geographic point in decimal degrees (WGS84).
///
/// Valid ranges are `lat ∈ [-90, 90]` and `lon ∈ [-180, 180]`. The
/// backend stores "no coordinates" as the reserved `(0, 0)` pair;
/// [`GeoPoint::is_sentinel`] is the one place that knows about it.
/// Everywhere else in the domain model, absent coordinates are an
/// explicit `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether this is the reserved `(0, 0)` "no coordinates" marker.
    ///
    /// The pair sits in the Gulf of Guinea, far from any shelter this
    /// system serves, so the backend uses it as its null value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_sentinel(self) -> bool {
        self.lat == 0.0 && self.lon == 0.0
    }
}

/// A single shelter entry.
///
/// Created by ingestion (or an administrative add) and never mutated
/// afterwards; the whole collection is a rebuildable view over the
/// source file, so there is no per-record update or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterRecord {
    /// Backend-assigned identifier. `None` before the record has been
    /// written (and on records fetched through queries that don't
    /// return IDs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display label. Falls back to the address when the source has no
    /// distinct name.
    pub name: String,
    /// Free-text postal address, for display only.
    pub address: String,
    /// Optional booking / more-info URL.
    #[serde(default)]
    pub booking_link: String,
    /// Optional free-text contact number.
    #[serde(default)]
    pub phone_number: String,
    /// Optional free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Shelter position. `None` when the source row had no usable
    /// coordinates; such records are excluded from distance ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
    /// Distance from the query point, attached during a proximity
    /// query only. Never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// A proximity search request.
///
/// Carries either raw `lat`/`lon` strings or a free-text `address`.
/// Coordinates stay as strings here so the resolver can distinguish
/// "bad coordinate format" from "coordinates absent".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Raw latitude, if the caller bypasses geocoding.
    pub lat: Option<String>,
    /// Raw longitude, if the caller bypasses geocoding.
    pub lon: Option<String>,
    /// Free-text address, used when no coordinates are given.
    pub address: Option<String>,
    /// Search radius override in kilometers.
    pub radius_km: Option<f64>,
}

impl SearchRequest {
    /// Builds a direct-coordinate request.
    #[must_use]
    pub fn from_coordinates(lat: &str, lon: &str) -> Self {
        Self {
            lat: Some(lat.to_string()),
            lon: Some(lon.to_string()),
            ..Self::default()
        }
    }

    /// Builds an address request.
    #[must_use]
    pub fn from_address(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            ..Self::default()
        }
    }
}

/// The outcome of a proximity search: the resolved point, the radius
/// actually applied, and the ranked shelter list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// The point the request resolved to.
    pub point: GeoPoint,
    /// Radius in kilometers that was applied.
    pub radius_km: f64,
    /// Shelters within the radius, ascending by `distance_km`.
    pub shelters: Vec<ShelterRecord>,
    /// Number of shelters returned.
    pub count: usize,
}

/// Summary of one ingestion batch.
///
/// Ingestion never aborts on a bad row or a failed write; this summary
/// is its only error surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    /// Total data rows read from the source file.
    pub rows_read: u64,
    /// Rows skipped for missing or non-numeric coordinates.
    pub rows_skipped: u64,
    /// Records successfully written to the store.
    pub created: u64,
    /// Records the store failed to write.
    pub failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_origin_only() {
        assert!(GeoPoint::new(0.0, 0.0).is_sentinel());
        assert!(!GeoPoint::new(0.0, 0.1).is_sentinel());
        assert!(!GeoPoint::new(34.0522, -118.2437).is_sentinel());
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = ShelterRecord {
            id: Some("abc".to_string()),
            name: "Shelter A".to_string(),
            address: "123 Main St".to_string(),
            booking_link: String::new(),
            phone_number: "555-1234".to_string(),
            notes: String::new(),
            coordinates: Some(GeoPoint::new(34.05, -118.24)),
            distance_km: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["phoneNumber"], "555-1234");
        assert_eq!(value["bookingLink"], "");
        // Query-time field is absent outside a query
        assert!(value.get("distanceKm").is_none());
    }

    #[test]
    fn absent_coordinates_are_omitted() {
        let record = ShelterRecord {
            id: None,
            name: "Shelter B".to_string(),
            address: "456 Elm St".to_string(),
            booking_link: String::new(),
            phone_number: String::new(),
            notes: String::new(),
            coordinates: None,
            distance_km: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("coordinates").is_none());
        assert!(value.get("id").is_none());
    }
}
