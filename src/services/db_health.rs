//! # Database Health Probe
//!
//! Answers one question: can a connection to the configured database be
//! opened and closed right now? Failures are not classified; any error,
//! including a timeout, is reported as `false`.
//!
//! ## Implementations
//!
//! - [`PgProbe`] - Opens a fresh PostgreSQL connection per probe
//! - [`StaticProbe`] - Always returns the same answer, for tests and local runs

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Connection, PgConnection, postgres::PgConnectOptions};
use tracing::{debug, instrument};

use crate::config::DatabaseSettings;

/// Trait for database reachability probes.
///
/// The `/status` handler only depends on this trait, so the real probe can be
/// swapped for a fixed answer in tests.
#[async_trait]
pub trait DbProbe: Send + Sync {
    /// Returns `true` iff the database accepted and cleanly released a
    /// connection during this call.
    async fn is_reachable(&self) -> bool;
}

/// Probe that dials PostgreSQL with the configured credentials.
///
/// A dedicated connection is opened for every probe rather than borrowed from
/// a pool, so the answer reflects the database's state at request time.
pub struct PgProbe {
    options: PgConnectOptions,
    timeout: Duration,
}

impl PgProbe {
    pub fn new(options: PgConnectOptions, timeout: Duration) -> Self {
        Self { options, timeout }
    }

    pub fn from_settings(settings: &DatabaseSettings) -> Self {
        debug!(
            host = %settings.host,
            port = settings.port,
            database = %settings.database,
            timeout_secs = settings.connect_timeout_secs,
            "Configuring PostgreSQL health probe"
        );
        Self::new(settings.connect_options(), settings.connect_timeout())
    }
}

#[async_trait]
impl DbProbe for PgProbe {
    #[instrument(skip_all)]
    async fn is_reachable(&self) -> bool {
        let attempt = async {
            let conn = PgConnection::connect_with(&self.options).await?;
            conn.close().await
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(error = %e, "Database probe failed");
                false
            }
            Err(_) => {
                debug!(timeout = ?self.timeout, "Database probe timed out");
                false
            }
        }
    }
}

/// Probe with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

#[async_trait]
impl DbProbe for StaticProbe {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}
