use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use reqwest::{Client, Method, Url};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use super::profile::WaitTime;
use super::stats::{Outcome, Stats, StatsReport};
use super::task::pick_weighted;
use super::{LoadProfile, LoadTestError, Task};

/// A task with its URL resolved against the target host.
struct Target {
    name: String,
    method: Method,
    url: Url,
}

/// Everything the simulated users share.
struct Plan {
    targets: Vec<Target>,
    weights: Vec<u32>,
    total_weight: u64,
}

/// Runs a load test until `profile.run_time` elapses or `shutdown` is
/// cancelled, then returns the collected statistics.
///
/// Users are started one every `1 / spawn_rate` seconds. Each user loops
/// forever: pick a task by weight, send it, record the outcome, wait.
/// Requests still in flight when the run stops are dropped and not counted.
///
/// # Errors
///
/// Only setup problems are errors (see [`LoadTestError`]). Failed requests
/// are counted in the report.
#[instrument(skip_all, fields(host = %profile.host, users = profile.users))]
pub async fn run(
    profile: &LoadProfile,
    tasks: &[Task],
    shutdown: CancellationToken,
) -> Result<StatsReport, LoadTestError> {
    let urls = profile.resolve(tasks)?;
    let client = Client::builder().timeout(profile.request_timeout).build()?;

    let plan = Arc::new(Plan {
        weights: tasks.iter().map(|t| t.weight).collect(),
        total_weight: tasks.iter().map(|t| u64::from(t.weight)).sum(),
        targets: tasks
            .iter()
            .zip(urls)
            .map(|(task, url)| Target {
                name: task.name(),
                method: task.method.clone(),
                url,
            })
            .collect(),
    });
    let stats = Arc::new(Stats::new());
    let stop = shutdown.child_token();
    let started = Instant::now();

    info!(
        spawn_rate = profile.spawn_rate,
        run_time = ?profile.run_time,
        "Starting load test"
    );

    if let Some(run_time) = profile.run_time {
        let stop = stop.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(run_time) => {
                    info!(?run_time, "Run time limit reached");
                    stop.cancel();
                }
                _ = stop.cancelled() => {}
            }
        });
    }

    let mut users = JoinSet::new();
    let spawn_interval = profile.spawn_interval()?;
    for id in 0..profile.users {
        if id > 0 {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = tokio::time::sleep(spawn_interval) => {}
            }
        }
        let user = SimulatedUser {
            id,
            client: client.clone(),
            plan: Arc::clone(&plan),
            wait: profile.wait,
            stats: Arc::clone(&stats),
            stop: stop.clone(),
        };
        users.spawn(user.run());
    }
    if !stop.is_cancelled() {
        info!(spawned = users.len(), "All users spawned");
    }

    stop.cancelled().await;
    let elapsed = started.elapsed();
    info!(elapsed = ?elapsed, "Stopping users");

    while let Some(joined) = users.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Simulated user task ended abnormally");
        }
    }

    Ok(stats.report(elapsed))
}

struct SimulatedUser {
    id: usize,
    client: Client,
    plan: Arc<Plan>,
    wait: WaitTime,
    stats: Arc<Stats>,
    stop: CancellationToken,
}

impl SimulatedUser {
    async fn run(self) {
        let mut rng = StdRng::from_os_rng();
        debug!(user = self.id, "User started");

        while !self.stop.is_cancelled() {
            let idx = pick_weighted(&self.plan.weights, self.plan.total_weight, &mut rng);
            let target = &self.plan.targets[idx];

            tokio::select! {
                _ = self.stop.cancelled() => break,
                (elapsed, outcome) = execute(&self.client, target) => {
                    trace!(user = self.id, name = %target.name, ?elapsed, ?outcome, "Request finished");
                    self.stats.record(&target.name, elapsed, &outcome);
                }
            }

            let pause = self.wait.sample(&mut rng);
            if pause.is_zero() {
                continue;
            }
            tokio::select! {
                _ = self.stop.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        debug!(user = self.id, "User stopped");
    }
}

/// Sends one request and reads the full body. Any 4xx/5xx status counts as
/// a failure; the body content is not inspected.
async fn execute(client: &Client, target: &Target) -> (Duration, Outcome) {
    let started = Instant::now();
    let response = client
        .request(target.method.clone(), target.url.clone())
        .send()
        .await;

    let outcome = match response {
        Ok(response) => {
            let status = response.status();
            match response.bytes().await {
                Ok(_) if status.is_client_error() || status.is_server_error() => {
                    Outcome::Failure {
                        error: format!("HTTP {status}"),
                    }
                }
                Ok(_) => Outcome::Success {
                    status: status.as_u16(),
                },
                Err(e) => Outcome::Failure {
                    error: describe(e),
                },
            }
        }
        Err(e) => Outcome::Failure { error: describe(e) },
    };

    (started.elapsed(), outcome)
}

/// Flattens an error and its causes into one line, without the URL so that
/// identical failures on one endpoint group together.
fn describe(e: reqwest::Error) -> String {
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
