//! Lookup service: a thin read layer over one loaded catalog snapshot.
//!
//! The catalog is loaded once at startup and held behind an immutable `Arc`;
//! nothing mutates it for the lifetime of the process. A future reload would
//! build a new snapshot and swap the handle, never edit in place.
//!
//! ## Endpoints
//!
//! - `GET /radio_stations` — name-keyed map of every station
//! - `GET /play_station/{station_id}` — playability check plus stream URL

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::catalog;
use crate::station::Station;

/// Immutable name-keyed snapshot served for the process lifetime.
pub type CatalogSnapshot = Arc<HashMap<String, Station>>;

/// Build the service router over a loaded snapshot.
pub fn router(catalog: CatalogSnapshot) -> Router {
    Router::new()
        .route("/radio_stations", get(list_stations))
        .route("/play_station/{station_id}", get(play_station))
        .with_state(catalog)
}

/// Load the catalog and serve it until shutdown.
///
/// A missing or malformed catalog file is a startup error: the service
/// refuses to come up with no data rather than serving an empty catalog
/// silently.
pub async fn serve(catalog_path: &FsPath, addr: SocketAddr) -> Result<()> {
    let stations = catalog::load(catalog_path)?;
    info!(count = stations.len(), path = %catalog_path.display(), "Catalog loaded");

    let snapshot: CatalogSnapshot = Arc::new(catalog::index_by_name(stations));
    let app = router(snapshot);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Lookup service listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}

async fn list_stations(State(catalog): State<CatalogSnapshot>) -> Json<HashMap<String, Station>> {
    Json((*catalog).clone())
}

/// `station_id` arrives percent-decoded from the router.
async fn play_station(
    State(catalog): State<CatalogSnapshot>,
    Path(station_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match catalog.get(&station_id) {
        Some(station) if station.playable => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Now playing {}", station.name),
                "stream_url": station.stream,
            })),
        ),
        Some(station) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("{} is not currently playable", station.name),
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Station not found" })),
        ),
    }
}
