use std::time::Duration;

use rand::Rng;
use reqwest::Url;

use super::{LoadTestError, Task};
use crate::utils::constant::DEFAULT_REQUEST_TIMEOUT;

/// Pause a simulated user takes after each task, sampled uniformly from
/// `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitTime {
    pub min: Duration,
    pub max: Duration,
}

impl WaitTime {
    /// No pause: users fire requests back to back.
    pub const ZERO: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub fn constant(wait: Duration) -> Self {
        Self {
            min: wait,
            max: wait,
        }
    }

    pub fn between(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub(super) fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rng.random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Shape of a load test: who is hit, by how many users, for how long.
#[derive(Debug, Clone)]
pub struct LoadProfile {
    /// Base URL of the target, e.g. `http://127.0.0.1:8000`.
    pub host: String,
    /// Number of concurrent simulated users at full ramp.
    pub users: usize,
    /// Users started per second while ramping up.
    pub spawn_rate: f64,
    /// Stop after this long. `None` runs until cancelled.
    pub run_time: Option<Duration>,
    pub wait: WaitTime,
    pub request_timeout: Duration,
}

impl LoadProfile {
    /// One user, spawned immediately, no pauses, no time limit.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            users: 1,
            spawn_rate: 1.0,
            run_time: None,
            wait: WaitTime::ZERO,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Delay between two user spawns. Rates so small that the delay does
    /// not fit in a `Duration` are rejected.
    pub(super) fn spawn_interval(&self) -> Result<Duration, LoadTestError> {
        if !(self.spawn_rate.is_finite() && self.spawn_rate > 0.0) {
            return Err(LoadTestError::InvalidProfile(
                "spawn rate must be a positive number",
            ));
        }
        Duration::try_from_secs_f64(1.0 / self.spawn_rate)
            .map_err(|_| LoadTestError::InvalidProfile("spawn rate is too small"))
    }

    /// Checks the profile and resolves one absolute URL per task.
    pub fn resolve(&self, tasks: &[Task]) -> Result<Vec<Url>, LoadTestError> {
        if self.users == 0 {
            return Err(LoadTestError::InvalidProfile("users must be at least 1"));
        }
        self.spawn_interval()?;
        if self.wait.min > self.wait.max {
            return Err(LoadTestError::InvalidProfile(
                "minimum wait must not exceed maximum wait",
            ));
        }
        if tasks.is_empty() {
            return Err(LoadTestError::InvalidProfile("no tasks to run"));
        }
        if tasks.iter().all(|t| t.weight == 0) {
            return Err(LoadTestError::InvalidProfile(
                "at least one task needs a non-zero weight",
            ));
        }

        let base = Url::parse(&self.host)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .ok_or_else(|| LoadTestError::InvalidHost(self.host.clone()))?;
        let base = base.as_str().trim_end_matches('/');

        tasks
            .iter()
            .map(|task| {
                if !task.path.starts_with('/') {
                    return Err(LoadTestError::InvalidTask {
                        path: task.path.clone(),
                        reason: "path must start with `/`",
                    });
                }
                Url::parse(&format!("{base}{}", task.path)).map_err(|_| {
                    LoadTestError::InvalidTask {
                        path: task.path.clone(),
                        reason: "does not form a valid URL",
                    }
                })
            })
            .collect()
    }
}

/// Parses durations such as `300s`, `20m`, `3h`, `1h30m` or a bare number of
/// seconds.
pub fn parse_run_time(raw: &str) -> Result<Duration, LoadTestError> {
    let invalid = || LoadTestError::InvalidRunTime(raw.to_string());
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(secs) = trimmed.parse::<u64>() {
        return match secs {
            0 => Err(invalid()),
            secs => Ok(Duration::from_secs(secs)),
        };
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    // Units must appear in h, m, s order, each at most once.
    let mut last_rank = 0;

    for ch in trimmed.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let (rank, multiplier) = match ch.to_ascii_lowercase() {
            'h' => (1, 3_600),
            'm' => (2, 60),
            's' => (3, 1),
            _ => return Err(invalid()),
        };
        if digits.is_empty() || rank <= last_rank {
            return Err(invalid());
        }
        let value: u64 = digits.parse().map_err(|_| invalid())?;
        total = value
            .checked_mul(multiplier)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(invalid)?;
        digits.clear();
        last_rank = rank;
    }

    if !digits.is_empty() || total == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(total))
}
