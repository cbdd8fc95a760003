//! # Telemetry
//!
//! Builds the global `tracing` subscriber. Output is human-readable by default;
//! set `LOG_FORMAT=json` for Bunyan-formatted JSON lines. `RUST_LOG` overrides
//! the default filter.

use std::str::FromStr;

use thiserror::Error;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt::MakeWriter, layer::SubscriberExt};

use crate::utils::constant::LOG_FORMAT_ENV;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("unknown log format `{0}`, expected `pretty` or `json`")]
    UnknownFormat(String),

    #[error("failed to install global subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" | "bunyan" => Ok(Self::Json),
            other => Err(TelemetryError::UnknownFormat(other.to_string())),
        }
    }
}

impl LogFormat {
    /// Reads `LOG_FORMAT`; unset means [`LogFormat::Pretty`].
    pub fn from_env() -> Result<Self, TelemetryError> {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

/// Composes a subscriber writing to `sink`.
///
/// `default_filter` applies only when `RUST_LOG` is not set.
pub fn get_subscriber<Sink>(
    name: String,
    default_filter: String,
    format: LogFormat,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (json_layers, pretty_layer) = match format {
        LogFormat::Json => (
            Some(JsonStorageLayer.and_then(BunyanFormattingLayer::new(name, sink))),
            None,
        ),
        LogFormat::Pretty => (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(sink)),
        ),
    };

    Registry::default()
        .with(env_filter)
        .with(json_layers)
        .with(pretty_layer)
}

/// Installs `subscriber` as the process-wide default. Call once.
pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync + 'static,
) -> Result<(), TelemetryError> {
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
