#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Durable storage and retrieval of shelter records.
//!
//! [`GeoStore`] fronts a document/vector backend (Weaviate in
//! production, reached through the [`backend::ShelterBackend`] trait)
//! and owns the failure policy at that boundary: backend errors are
//! logged and converted to empty results or failure markers, never
//! propagated. A transient store outage degrades a search to "no
//! shelters found" instead of crashing the request; operators detect
//! it from the error logs.

pub mod backend;
pub mod weaviate;
pub mod wire;

use std::sync::Arc;

use shelter_map_shelter_models::ShelterRecord;

use crate::backend::ShelterBackend;

/// Default fetch limit for [`GeoStore::get_all`].
///
/// Large enough for the known dataset (a few hundred records), not a
/// general solution. This is the scale ceiling of the linear-scan
/// design; past it, records silently fall off the end of searches.
pub const DEFAULT_FETCH_LIMIT: u64 = 1000;

/// Shelter repository over an injected backend.
///
/// Construct once at process startup and share (it is `Clone` and all
/// methods take `&self`). No in-process mutable state; concurrent
/// searches only share the read path into the backend.
#[derive(Clone)]
pub struct GeoStore {
    backend: Arc<dyn ShelterBackend>,
}

impl GeoStore {
    /// Creates a store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn ShelterBackend>) -> Self {
        Self { backend }
    }

    /// Ensures the shelter collection exists, creating it if needed.
    ///
    /// Idempotent: returns `true` if the collection exists after the
    /// call, whether it was just created or already there. A
    /// pre-existing collection is success, not an error. Returns
    /// `false` only on backend failure (logged).
    pub async fn ensure_schema(&self) -> bool {
        match self.backend.schema_exists(wire::SHELTER_CLASS).await {
            Ok(true) => {
                log::info!("Schema for {} already exists", wire::SHELTER_CLASS);
                return true;
            }
            Ok(false) => {}
            Err(e) => {
                log::error!("Failed to check schema: {e}");
                return false;
            }
        }

        match self
            .backend
            .create_schema(&wire::shelter_class_definition())
            .await
        {
            Ok(()) => {
                log::info!("Created schema for {}", wire::SHELTER_CLASS);
                true
            }
            Err(e) => {
                log::error!("Failed to create schema: {e}");
                false
            }
        }
    }

    /// Inserts one record and returns its backend-assigned ID, or
    /// `None` on failure.
    ///
    /// The ingestion pipeline counts `None` results; a failed insert
    /// is never fatal to a batch.
    pub async fn create(&self, record: &ShelterRecord) -> Option<String> {
        let properties = wire::to_properties(record);
        match self.backend.insert(wire::SHELTER_CLASS, properties).await {
            Ok(id) => {
                log::info!("Added shelter: {} with ID: {id}", record.address);
                Some(id)
            }
            Err(e) => {
                log::error!("Failed to add shelter {}: {e}", record.address);
                None
            }
        }
    }

    /// Retrieves up to `limit` records.
    ///
    /// Counts first: a zero count short-circuits to an empty result
    /// without issuing the fetch, saving a round trip and leaving a
    /// distinguishable "no data loaded" line in the logs. Backend
    /// errors also yield an empty result (logged).
    pub async fn get_all(&self, limit: u64) -> Vec<ShelterRecord> {
        let total = match self.backend.count(wire::SHELTER_CLASS).await {
            Ok(count) => count,
            Err(e) => {
                log::error!("Failed to count shelters: {e}");
                return Vec::new();
            }
        };
        log::info!("Total shelter count in store: {total}");

        if total == 0 {
            log::warn!("No shelters found in the store, please ensure data is loaded");
            return Vec::new();
        }

        match self
            .backend
            .fetch_all(wire::SHELTER_CLASS, wire::SHELTER_FIELDS, limit)
            .await
        {
            Ok(objects) => {
                let shelters: Vec<ShelterRecord> =
                    objects.iter().map(wire::from_properties).collect();
                log::info!("Retrieved {} shelters", shelters.len());
                shelters
            }
            Err(e) => {
                log::error!("Failed to fetch shelters: {e}");
                Vec::new()
            }
        }
    }

    /// Drops the whole collection and recreates it empty.
    ///
    /// The collection is a rebuildable view over the source file, so
    /// this is the only deletion path; there is no per-record delete.
    /// Returns `true` if the collection exists (empty) afterwards.
    pub async fn reset(&self) -> bool {
        if let Err(e) = self.backend.delete_schema(wire::SHELTER_CLASS).await {
            log::error!("Failed to drop schema: {e}");
            return false;
        }
        log::info!("Dropped collection {}", wire::SHELTER_CLASS);
        self.ensure_schema().await
    }
}
