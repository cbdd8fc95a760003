//! # Pulse - Service Health Endpoint and Load Generator
//!
//! ## Modules
//!
//! - [`config`] - TOML settings for the database and HTTP server
//! - [`handlers`] - HTTP request handlers for `/` and `/status`
//! - [`services`] - Database health probe and timestamp clock
//! - [`load`] - HTTP load generator driving `/` and `/status`
//! - [`telemetry`] - `tracing` subscriber setup
//! - [`utils`] - Constants and HTML rendering

pub mod config;
pub mod error;
pub mod handlers;
pub mod load;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::config::{ServerSettings, Settings};
use crate::handlers::{home, not_found, status};
use crate::models::AppState;
use crate::services::db_health::{DbProbe, PgProbe};

/// Creates an Axum router whose `/status` probes the configured PostgreSQL.
///
/// This is a convenience function that calls [`app_with_probe`] with a
/// [`PgProbe`] built from `settings.database`.
#[inline]
pub fn app(settings: &Settings) -> Router {
    let probe = Arc::new(PgProbe::from_settings(&settings.database));
    app_with_probe(&settings.server, probe)
}

/// Creates an Axum router with application routes and state.
///
/// # Arguments
///
/// * `server` - Server settings; `static_dir` is mounted under `/static`
/// * `db_probe` - Probe consulted by `/status` on every request
///
/// # Returns
///
/// A configured Axum router with all application routes and middleware
pub fn app_with_probe(server: &ServerSettings, db_probe: Arc<dyn DbProbe>) -> Router {
    info!(static_dir = %server.static_dir.display(), "Building router");

    let state = Arc::new(AppState::new(db_probe));

    Router::new()
        .route("/", get(home))
        .route("/status", get(status))
        .nest_service("/static", ServeDir::new(&server.static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
