#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Proximity search orchestration.
//!
//! [`ProximitySearchService`] wires the resolver, the store, and the
//! distance engine together: resolve a point, fetch the current
//! shelter set, rank by distance. It holds no state of its own beyond
//! the injected collaborators and is safe to share across concurrent
//! requests.

use shelter_map_resolver::{LocationResolver, ResolveError};
use shelter_map_shelter_models::{SearchRequest, SearchResults, ShelterRecord};
use shelter_map_store::{DEFAULT_FETCH_LIMIT, GeoStore};
use thiserror::Error;

/// Default search radius in kilometers, used for both the
/// direct-coordinate and address paths unless the request overrides
/// it.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Errors a search can surface to callers.
///
/// Zero shelters within radius is *not* an error: callers get a valid
/// empty result. Store outages also never appear here; the store
/// degrades to an empty shelter set by contract.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request could not be resolved to a point.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Stateless orchestrator over injected collaborators.
///
/// Construct once at process startup (with the resolver and store
/// built by the entry point) and reuse for every request.
#[derive(Clone)]
pub struct ProximitySearchService {
    resolver: LocationResolver,
    store: GeoStore,
    default_radius_km: f64,
}

impl ProximitySearchService {
    /// Creates a service with the default 10 km radius policy.
    #[must_use]
    pub fn new(resolver: LocationResolver, store: GeoStore) -> Self {
        Self {
            resolver,
            store,
            default_radius_km: DEFAULT_RADIUS_KM,
        }
    }

    /// Overrides the default radius applied when a request carries
    /// none.
    #[must_use]
    pub const fn with_default_radius(mut self, radius_km: f64) -> Self {
        self.default_radius_km = radius_km;
        self
    }

    /// Resolves the request to a point and returns the shelters within
    /// radius, ranked ascending by distance.
    ///
    /// Fails fast on resolution errors; past that point the search
    /// cannot fail, only come back empty.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Resolve`] when the request carries
    /// neither usable coordinates nor a geocodable address.
    pub async fn resolve_and_search(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResults, SearchError> {
        let point = self.resolver.resolve(request).await?;
        let radius_km = request.radius_km.unwrap_or(self.default_radius_km);

        log::info!(
            "Searching for shelters near ({}, {}) within {radius_km}km",
            point.lat,
            point.lon
        );

        let records = self.store.get_all(DEFAULT_FETCH_LIMIT).await;
        let shelters = shelter_map_geo::rank_within_radius(point, &records, radius_km);

        log::info!("Found {} shelters within {radius_km}km", shelters.len());

        Ok(SearchResults {
            point,
            radius_km,
            count: shelters.len(),
            shelters,
        })
    }

    /// Returns the full, unranked shelter set (debug/administrative
    /// surface).
    pub async fn list_all(&self) -> Vec<ShelterRecord> {
        let shelters = self.store.get_all(DEFAULT_FETCH_LIMIT).await;
        let with_coordinates = shelters
            .iter()
            .filter(|s| s.coordinates.is_some())
            .count();
        log::info!(
            "Listing {} shelters ({with_coordinates} with usable coordinates)",
            shelters.len()
        );
        shelters
    }
}
