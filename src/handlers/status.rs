//! # Status Handler
//!
//! Health endpoint for load balancers and monitoring. The process answering
//! at all means it is alive; the body additionally reports whether the
//! configured database is reachable.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::{debug, instrument};

use crate::models::{AppState, StatusResponse};
use crate::utils::constant::STATUS_OK;

/// Reports service liveness and database connectivity.
///
/// GET /status
///
/// The database is probed on every call. A failed probe is reported as
/// `db_connected: false` and never turns into an error response.
///
/// # Returns
///
/// Always `200 OK` with [`StatusResponse`].
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let db_connected = state.db_probe.is_reachable().await;
    let timestamp = state.clock.now();

    debug!(db_connected, timestamp, "Status requested");

    Json(StatusResponse {
        status: STATUS_OK.to_string(),
        db_connected,
        timestamp,
    })
}
