//! The narrow interface the store needs from a document/vector backend.
//!
//! [`GeoStore`](crate::GeoStore) only ever talks to this trait, so tests
//! (and any future backend swap) plug in without touching the store's
//! failure policy.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an unexpected status code.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, for the logs.
        body: String,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Logical operations against the shelter collection's backend.
///
/// Mirrors what a Weaviate-style document store offers: class-level
/// schema management, single-object inserts, an aggregate count, and a
/// bulk fetch. Nothing here knows about [`ShelterRecord`]; records are
/// mapped to and from property JSON in [`crate::wire`].
///
/// [`ShelterRecord`]: shelter_map_shelter_models::ShelterRecord
#[async_trait]
pub trait ShelterBackend: Send + Sync {
    /// Whether a class with the given name already exists.
    async fn schema_exists(&self, class: &str) -> Result<bool, BackendError>;

    /// Creates a class from a full class definition.
    async fn create_schema(&self, class_definition: &Value) -> Result<(), BackendError>;

    /// Drops a class and every object in it.
    async fn delete_schema(&self, class: &str) -> Result<(), BackendError>;

    /// Inserts one object and returns its backend-assigned ID.
    async fn insert(&self, class: &str, properties: Value) -> Result<String, BackendError>;

    /// Number of objects in the class.
    async fn count(&self, class: &str) -> Result<u64, BackendError>;

    /// Fetches up to `limit` objects, each as a property map containing
    /// the requested fields.
    async fn fetch_all(
        &self,
        class: &str,
        fields: &str,
        limit: u64,
    ) -> Result<Vec<Value>, BackendError>;
}
