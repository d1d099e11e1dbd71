#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch loader for tabular shelter data.
//!
//! Reads the source CSV (through the [`realign`] adapter that repairs
//! its known column misalignment), validates coordinates row by row,
//! and writes valid rows to the store one at a time. A bad row or a
//! failed write never aborts the batch; the returned
//! [`IngestSummary`] is the only error surface.

pub mod realign;

use std::io::Read;
use std::path::Path;

use shelter_map_shelter_models::{GeoPoint, IngestSummary, ShelterRecord};
use shelter_map_store::GeoStore;
use thiserror::Error;

/// Errors that make a whole ingestion run impossible.
///
/// Per-row problems are not errors; they are counted in the summary.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source file could not be opened.
    #[error("Failed to open source file: {0}")]
    Io(#[from] std::io::Error),

    /// The source file is not readable as CSV at all.
    #[error("Failed to read source file: {0}")]
    Csv(#[from] csv::Error),
}

/// Ingests the shelter CSV at `path` into the store.
///
/// # Errors
///
/// Returns [`IngestError`] only if the file itself cannot be opened;
/// everything past that point is tallied, not raised.
pub async fn ingest_file(store: &GeoStore, path: &Path) -> Result<IngestSummary, IngestError> {
    log::info!("Loading shelters from {}...", path.display());
    let file = std::fs::File::open(path)?;
    ingest_reader(store, file).await
}

/// Ingests shelter CSV data from any reader.
///
/// Rows with a missing or non-numeric coordinate are skipped and
/// counted. Skipping at ingestion time differs deliberately from the
/// query-time handling of stored sentinel coordinates, which are
/// excluded per search. Nothing without a usable position is ever
/// inserted.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if the header row cannot be read.
pub async fn ingest_reader<R: Read>(
    store: &GeoStore,
    reader: R,
) -> Result<IngestSummary, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    // Surface an unreadable file immediately rather than as one
    // skipped row per record.
    csv_reader.headers()?;

    let mut summary = IngestSummary::default();

    for (row_number, result) in csv_reader.records().enumerate() {
        summary.rows_read += 1;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping row {}: unreadable ({e})", row_number + 1);
                summary.rows_skipped += 1;
                continue;
            }
        };

        let row = realign::realign(&record);

        let Some(coordinates) = parse_coordinates(&row.lat, &row.lon) else {
            log::warn!(
                "Skipping row {}: missing or invalid coordinates",
                row_number + 1
            );
            summary.rows_skipped += 1;
            continue;
        };

        let shelter = ShelterRecord {
            id: None,
            // The source carries no distinct name; the address doubles
            // as the display label.
            name: row.address.clone(),
            address: row.address,
            booking_link: row.booking_link,
            phone_number: row.phone_number,
            notes: row.notes,
            coordinates: Some(coordinates),
            distance_km: None,
        };

        if store.create(&shelter).await.is_some() {
            summary.created += 1;
        } else {
            summary.failed += 1;
        }
    }

    log::info!(
        "Import summary: {} rows read, {} skipped, {} created, {} failed",
        summary.rows_read,
        summary.rows_skipped,
        summary.created,
        summary.failed
    );

    Ok(summary)
}

/// Parses the realigned coordinate pair; `None` means skip the row.
fn parse_coordinates(lat: &str, lon: &str) -> Option<GeoPoint> {
    if lat.is_empty() || lon.is_empty() {
        return None;
    }
    let lat = lat.parse::<f64>().ok()?;
    let lon = lon.parse::<f64>().ok()?;
    Some(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;
    use shelter_map_store::backend::{BackendError, ShelterBackend};

    use super::*;

    const HEADER: &str = "address,bookinglink,lat,lon,phonenumber,notes\n";

    /// Backend that remembers inserted property maps and can be told
    /// to fail every insert.
    #[derive(Default)]
    struct RecordingBackend {
        fail_inserts: bool,
        inserts: std::sync::Mutex<Vec<Value>>,
        insert_calls: AtomicU64,
    }

    #[async_trait]
    impl ShelterBackend for RecordingBackend {
        async fn schema_exists(&self, _class: &str) -> Result<bool, BackendError> {
            Ok(true)
        }

        async fn create_schema(&self, _class_definition: &Value) -> Result<(), BackendError> {
            Ok(())
        }

        async fn delete_schema(&self, _class: &str) -> Result<(), BackendError> {
            Ok(())
        }

        async fn insert(&self, _class: &str, properties: Value) -> Result<String, BackendError> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_inserts {
                return Err(BackendError::UnexpectedStatus {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            self.inserts.lock().unwrap().push(properties);
            Ok("new-id".to_string())
        }

        async fn count(&self, _class: &str) -> Result<u64, BackendError> {
            Ok(0)
        }

        async fn fetch_all(
            &self,
            _class: &str,
            _fields: &str,
            _limit: u64,
        ) -> Result<Vec<Value>, BackendError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn ingests_shifted_row_correctly() {
        let backend = Arc::new(RecordingBackend::default());
        let store = GeoStore::new(backend.clone());

        let csv = format!(
            "{HEADER}123 Main St,https://example.com,555-1234,34.05,-118.24,Pets allowed\n"
        );
        let summary = ingest_reader(&store, csv.as_bytes()).await.unwrap();

        assert_eq!(summary.rows_read, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.rows_skipped, 0);

        let inserts = backend.inserts.lock().unwrap();
        let props = &inserts[0];
        assert_eq!(props["phoneNumber"], "555-1234");
        assert_eq!(props["coordinates"]["latitude"], 34.05);
        assert_eq!(props["coordinates"]["longitude"], -118.24);
        // Name synthesized from the address.
        assert_eq!(props["name"], "123 Main St");
    }

    #[tokio::test]
    async fn skips_rows_with_bad_coordinates() {
        let backend = Arc::new(RecordingBackend::default());
        let store = GeoStore::new(backend.clone());

        let csv = format!(
            "{HEADER}\
             Good Row,link,555-1111,34.05,-118.24,\n\
             No Coords,link,555-2222,,,\n\
             Bad Coords,link,555-3333,not-a-number,-118.24,\n"
        );
        let summary = ingest_reader(&store, csv.as_bytes()).await.unwrap();

        assert_eq!(summary.rows_read, 3);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.rows_skipped, 2);
        // Skipped rows never reach the backend.
        assert_eq!(backend.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn insert_failures_are_counted_not_fatal() {
        let backend = Arc::new(RecordingBackend {
            fail_inserts: true,
            ..RecordingBackend::default()
        });
        let store = GeoStore::new(backend.clone());

        let csv = format!(
            "{HEADER}\
             Row One,link,555-1111,34.05,-118.24,\n\
             Row Two,link,555-2222,34.06,-118.25,\n"
        );
        let summary = ingest_reader(&store, csv.as_bytes()).await.unwrap();

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.created, 0);
        // The second row was still attempted after the first failed.
        assert_eq!(backend.insert_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_file_yields_empty_summary() {
        let backend = Arc::new(RecordingBackend::default());
        let store = GeoStore::new(backend);

        let summary = ingest_reader(&store, HEADER.as_bytes()).await.unwrap();
        assert_eq!(summary, IngestSummary::default());
    }
}
