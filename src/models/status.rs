use serde::{Deserialize, Serialize};

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `"ok"` while the process is serving requests.
    pub status: String,
    pub db_connected: bool,
    /// Seconds since the Unix epoch, with sub-second precision.
    pub timestamp: f64,
}
