#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pure distance math for shelter ranking.
//!
//! Computes great-circle distances with the haversine formula and
//! filters/sorts shelter records around a query point. Deliberately a
//! linear scan: the known dataset is a few hundred records, so no
//! spatial index is warranted (and none is wanted; see the fetch limit
//! in `shelter_map_store`).

use shelter_map_shelter_models::{GeoPoint, ShelterRecord};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// How many nearest candidates to log when nothing is within radius.
const NEAREST_DIAGNOSTIC_COUNT: usize = 3;

/// Great-circle distance between two points in kilometers.
///
/// Inputs are decimal degrees. Symmetric, and zero for identical
/// points.
#[must_use]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Distance from a query point to a shelter, if the shelter has
/// coordinates.
#[must_use]
pub fn distance_to(point: GeoPoint, record: &ShelterRecord) -> Option<f64> {
    record
        .coordinates
        .map(|coords| haversine(point.lat, point.lon, coords.lat, coords.lon))
}

/// Filters `records` to those within `radius_km` of `point`, sorted
/// ascending by distance.
///
/// Each returned record carries its distance in `distance_km`. Records
/// without coordinates are excluded entirely, not treated as distance
/// zero or infinity. Ties keep the original retrieval order (the sort
/// is stable).
///
/// When nothing is within radius but candidates with coordinates
/// exist, the nearest few are logged for operators and the caller
/// still receives an empty list. Surfacing "nearest is N km away" to
/// callers is a product decision that has not been taken.
#[must_use]
pub fn rank_within_radius(
    point: GeoPoint,
    records: &[ShelterRecord],
    radius_km: f64,
) -> Vec<ShelterRecord> {
    let mut ranked: Vec<ShelterRecord> = records
        .iter()
        .filter_map(|record| {
            distance_to(point, record).map(|distance| {
                let mut with_distance = record.clone();
                with_distance.distance_km = Some(distance);
                with_distance
            })
        })
        .collect();

    // Stable sort: equal distances keep retrieval order.
    ranked.sort_by(|a, b| {
        let da = a.distance_km.unwrap_or(f64::INFINITY);
        let db = b.distance_km.unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });

    let cutoff = ranked
        .iter()
        .position(|r| r.distance_km.is_none_or(|d| d > radius_km))
        .unwrap_or(ranked.len());

    if cutoff == 0 && !ranked.is_empty() {
        log::info!("No shelters within {radius_km}km, closest candidates:");
        for (i, shelter) in ranked.iter().take(NEAREST_DIAGNOSTIC_COUNT).enumerate() {
            log::info!(
                "  {}. {} - {:.2} km away",
                i + 1,
                shelter.address,
                shelter.distance_km.unwrap_or(f64::INFINITY)
            );
        }
    }

    ranked.truncate(cutoff);
    ranked
}
