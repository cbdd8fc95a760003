//! # Configuration
//!
//! Settings are read from a TOML file. The path comes from the `APP_CONFIG`
//! environment variable and falls back to [`DEFAULT_CONFIG_PATH`].
//!
//! ```toml
//! [database]
//! database = "pulse"
//! user = "postgres"
//! password = "postgres"
//! host = "localhost"
//! port = 5432
//!
//! [server]
//! port = 8000
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;
use tracing::{debug, info};

use crate::utils::constant::*;

/// Errors raised while loading settings. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub database: String,
    pub user: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_host")]
    pub host: String,
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_DB_CONNECT_TIMEOUT.as_secs()
}

fn default_server_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATIC_DIR)
}

impl Settings {
    /// Loads settings from `$APP_CONFIG`, or `config.toml` when unset.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(raw)?;
        debug!(
            db_host = %settings.database.host,
            db_port = settings.database.port,
            db_name = %settings.database.database,
            server_port = settings.server.port,
            "Configuration parsed"
        );
        Ok(settings)
    }
}

impl DatabaseSettings {
    /// Connection options for a single PostgreSQL connection using the
    /// configured credentials.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.database)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
