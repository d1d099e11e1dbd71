#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `shelter-map`: manage and query the shelter proximity engine.
//!
//! The process entry point owns construction: the Weaviate store and
//! the location resolver are built once from the environment
//! (`WEAVIATE_URL`, `MAPBOX_ACCESS_TOKEN`, `SHELTER_MAP_REGION`) and
//! injected into the search service. Logging is `RUST_LOG`-driven.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use shelter_map_resolver::{LocationResolver, region};
use shelter_map_search::ProximitySearchService;
use shelter_map_shelter_models::SearchRequest;
use shelter_map_store::{GeoStore, weaviate::WeaviateBackend};

#[derive(Parser)]
#[command(name = "shelter-map", about = "Emergency shelter proximity engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ensure the shelter collection exists (optionally dropping it
    /// first)
    Schema {
        /// Drop and recreate the collection, discarding all records
        #[arg(long)]
        reset: bool,
    },
    /// Bulk-load shelters from the tabular export
    Ingest {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Find shelters near coordinates or an address
    Search {
        /// Latitude (bypasses geocoding; requires --lon)
        #[arg(long)]
        lat: Option<String>,
        /// Longitude (bypasses geocoding; requires --lat)
        #[arg(long)]
        lon: Option<String>,
        /// Free-text address to geocode
        #[arg(long)]
        address: Option<String>,
        /// Search radius in kilometers (default 10)
        #[arg(long)]
        radius: Option<f64>,
    },
    /// List every stored shelter (debug)
    List,
}

fn store_from_env() -> Result<GeoStore, Box<dyn std::error::Error>> {
    let url =
        std::env::var("WEAVIATE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    log::info!("Using shelter store at {url}");
    let backend = WeaviateBackend::new(&url)?;
    Ok(GeoStore::new(Arc::new(backend)))
}

fn resolver_from_env() -> Result<LocationResolver, Box<dyn std::error::Error>> {
    let token = std::env::var("MAPBOX_ACCESS_TOKEN").ok();
    let region = match std::env::var("SHELTER_MAP_REGION") {
        Ok(id) => region::region_by_id(&id).ok_or_else(|| format!("Unknown region '{id}'"))?,
        Err(_) => region::default_region(),
    };
    log::info!("Target region: {}", region.name);
    Ok(LocationResolver::new(token, region)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Schema { reset } => {
            let store = store_from_env()?;
            let ok = if reset {
                store.reset().await
            } else {
                store.ensure_schema().await
            };
            if !ok {
                return Err("Schema operation failed; see logs".into());
            }
            println!("Shelter collection is ready");
        }
        Command::Ingest { file } => {
            let store = store_from_env()?;
            if !store.ensure_schema().await {
                return Err("Could not ensure schema before ingesting".into());
            }
            let summary = shelter_map_ingest::ingest_file(&store, &file).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Search {
            lat,
            lon,
            address,
            radius,
        } => {
            let service = ProximitySearchService::new(resolver_from_env()?, store_from_env()?);
            let request = SearchRequest {
                lat,
                lon,
                address,
                radius_km: radius,
            };
            let results = service.resolve_and_search(&request).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::List => {
            let service = ProximitySearchService::new(resolver_from_env()?, store_from_env()?);
            let shelters = service.list_all().await;
            println!("{}", serde_json::to_string_pretty(&shelters)?);
        }
    }

    Ok(())
}
