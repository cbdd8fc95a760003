//! # Load Generator
//!
//! Simulates a population of users hammering a running service with HTTP
//! requests and aggregates per-endpoint statistics.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), pulse::load::LoadTestError> {
//! use std::time::Duration;
//! use pulse::load::{LoadProfile, default_tasks, run};
//! use tokio_util::sync::CancellationToken;
//!
//! let mut profile = LoadProfile::new("http://127.0.0.1:8000");
//! profile.users = 10;
//! profile.spawn_rate = 2.0;
//! profile.run_time = Some(Duration::from_secs(30));
//!
//! let report = run(&profile, &default_tasks(), CancellationToken::new()).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

mod profile;
mod runner;
mod stats;
mod task;

pub use profile::{LoadProfile, WaitTime, parse_run_time};
pub use runner::run;
pub use stats::{EndpointSummary, FailureSummary, Outcome, Stats, StatsReport};
pub use task::{Task, default_tasks};

use thiserror::Error;

/// Errors that prevent a load test from starting.
///
/// Individual request failures are not errors; they are counted in [`Stats`].
#[derive(Debug, Error)]
pub enum LoadTestError {
    #[error("invalid host `{0}`: expected an absolute http(s) URL")]
    InvalidHost(String),

    #[error("invalid load profile: {0}")]
    InvalidProfile(&'static str),

    #[error("invalid task `{path}`: {reason}")]
    InvalidTask { path: String, reason: &'static str },

    #[error("invalid run time `{0}`: expected e.g. `300s`, `20m`, `1h30m`")]
    InvalidRunTime(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
