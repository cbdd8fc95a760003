//! # Application Constants
//!
//! Defaults and fixed values used throughout the service and the load generator.

use std::time::Duration;

/// Environment variable naming the config file to load.
pub const CONFIG_PATH_ENV: &str = "APP_CONFIG";

/// Config file used when `APP_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Bind to all interfaces unless `server.host` says otherwise.
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

pub const DEFAULT_STATIC_DIR: &str = "static";

/// Upper bound on a single health probe's connect + close.
///
/// The probe runs inside the `/status` request, so an unroutable database
/// host must not hold the request open indefinitely.
pub const DEFAULT_DB_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default `tracing` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "pulse=info,tower_http=info";

/// Environment variable selecting the log output format (`pretty` or `json`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Value of the `status` field in every `/status` response.
pub const STATUS_OK: &str = "ok";

/// Per-request timeout used by the load generator unless overridden.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
