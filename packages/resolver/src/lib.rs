#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns a search request into exactly one geographic point.
//!
//! Two paths: raw coordinates are parsed directly (no geocoder
//! involved), and free-text addresses are biased toward the target
//! region (see [`region`]) and sent to the Mapbox geocoder. Only the
//! single top match is used.

pub mod mapbox;
pub mod region;

use std::time::Duration;

use shelter_map_shelter_models::{GeoPoint, SearchRequest};
use thiserror::Error;

use crate::region::Region;

/// Fixed timeout on geocoding calls. Conservative: a slow geocoder
/// should fail a single request, not hold its worker hostage.
const GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from location resolution.
///
/// Each variant maps to a distinct caller-visible outcome: missing
/// credentials are a configuration problem fatal to the address path
/// only, bad coordinates and missing fields are the caller's fault,
/// and upstream failures are the geocoder's.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The geocoder credential is not configured.
    #[error("Geocoding credential is not configured")]
    MissingCredentials,

    /// The geocoder found no match for the address.
    #[error("No geocoding results found for address: {address}")]
    NoResults {
        /// The (normalized) address that produced no match.
        address: String,
    },

    /// The geocoder answered with a non-2xx status.
    #[error("Geocoder error: {status} - {body}")]
    Upstream {
        /// HTTP status code (0 for pre-request failures).
        status: u16,
        /// Response body, for the logs.
        body: String,
    },

    /// Transport-level failure talking to the geocoder.
    #[error("Geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A direct coordinate could not be parsed as a number.
    #[error("Invalid latitude or longitude: {value}")]
    InvalidCoordinates {
        /// The offending input.
        value: String,
    },

    /// Neither coordinates nor an address were supplied.
    #[error("Either address or lat/lon parameters are required")]
    MissingFields,
}

/// Resolves [`SearchRequest`]s to [`GeoPoint`]s.
///
/// Construct once at startup and share; holds only an HTTP client and
/// configuration.
#[derive(Clone)]
pub struct LocationResolver {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    region: Region,
}

impl LocationResolver {
    /// Creates a resolver for the given region.
    ///
    /// `access_token` may be `None`; construction still succeeds and
    /// only the address path will fail, with
    /// [`ResolveError::MissingCredentials`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Http`] if the HTTP client cannot be
    /// built.
    pub fn new(access_token: Option<String>, region: Region) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(GEOCODE_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: mapbox::DEFAULT_BASE_URL.to_string(),
            access_token,
            region,
        })
    }

    /// Overrides the geocoder endpoint (used by tests and self-hosted
    /// proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Produces exactly one point from the request.
    ///
    /// Coordinates win over the address when both are present. The
    /// direct path applies no range checking beyond a successful
    /// numeric parse; callers bypassing geocoding are trusted to
    /// supply sane coordinates.
    ///
    /// # Errors
    ///
    /// See [`ResolveError`] for the taxonomy.
    pub async fn resolve(&self, request: &SearchRequest) -> Result<GeoPoint, ResolveError> {
        if request.lat.is_some() || request.lon.is_some() {
            return parse_direct(request.lat.as_deref(), request.lon.as_deref());
        }

        let Some(address) = request.address.as_deref() else {
            return Err(ResolveError::MissingFields);
        };
        self.resolve_address(address).await
    }

    /// Geocodes a free-text address via the region heuristic.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingCredentials`] without a token,
    /// [`ResolveError::NoResults`] when the geocoder finds nothing,
    /// and upstream/transport errors otherwise.
    pub async fn resolve_address(&self, address: &str) -> Result<GeoPoint, ResolveError> {
        let Some(token) = self.access_token.as_deref() else {
            log::error!("Geocoding requested but no access token is configured");
            return Err(ResolveError::MissingCredentials);
        };

        let normalized = self.region.normalize_address(address);
        if normalized != address {
            log::info!("Normalized address: {normalized}");
        }

        let point = mapbox::geocode_forward(&self.client, &self.base_url, token, &normalized)
            .await?
            .ok_or_else(|| {
                log::warn!("No geocoding results found for address: {normalized}");
                ResolveError::NoResults {
                    address: normalized.clone(),
                }
            })?;

        log::info!("Geocoded coordinates: ({}, {})", point.lat, point.lon);
        Ok(point)
    }
}

/// Parses the direct-coordinate path.
fn parse_direct(lat: Option<&str>, lon: Option<&str>) -> Result<GeoPoint, ResolveError> {
    let (Some(lat_str), Some(lon_str)) = (lat, lon) else {
        // One of the pair is absent; distinguishable from a bad format
        // only by the message. Both are the caller's problem.
        return Err(ResolveError::InvalidCoordinates {
            value: "latitude and longitude must be supplied together".to_string(),
        });
    };

    let lat = parse_coordinate(lat_str)?;
    let lon = parse_coordinate(lon_str)?;
    Ok(GeoPoint::new(lat, lon))
}

fn parse_coordinate(value: &str) -> Result<f64, ResolveError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ResolveError::InvalidCoordinates {
            value: value.to_string(),
        })
}
