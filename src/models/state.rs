use std::sync::Arc;

use tracing::info;

use crate::services::{clock::StatusClock, db_health::DbProbe};

/// Application state shared across requests. Needs to be thread-safe.
pub struct AppState {
    /// Database reachability probe consulted by `/status`.
    pub db_probe: Arc<dyn DbProbe>,
    /// Source of non-decreasing `/status` timestamps.
    pub clock: StatusClock,
}

impl AppState {
    pub fn new(db_probe: Arc<dyn DbProbe>) -> Self {
        info!("Initializing application state");

        Self {
            db_probe,
            clock: StatusClock::new(),
        }
    }
}
