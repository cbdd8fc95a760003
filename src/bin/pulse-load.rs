//! Command-line load generator for a running `pulse` service.
//!
//! ```text
//! pulse-load --host http://127.0.0.1:8000 -u 50 -r 5 -t 2m
//! ```
//!
//! Exits with 0 when every request succeeded, 1 when any request failed and
//! 2 when the load test could not start.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use pulse::load::{LoadProfile, WaitTime, default_tasks, parse_run_time, run};
use pulse::telemetry::{LogFormat, get_subscriber, init_subscriber};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "pulse-load", version, about = "Load generator for GET / and GET /status")]
struct Cli {
    /// Base URL of the service under test.
    #[arg(short = 'H', long)]
    host: String,

    /// Peak number of concurrent users.
    #[arg(short, long, default_value_t = 1)]
    users: usize,

    /// Users started per second.
    #[arg(short = 'r', long, default_value_t = 1.0)]
    spawn_rate: f64,

    /// Stop after this long, e.g. `300s`, `20m`, `1h30m`. Runs until Ctrl-C if omitted.
    #[arg(short = 't', long, value_parser = parse_run_time)]
    run_time: Option<Duration>,

    /// Minimum pause between a user's requests, in seconds.
    #[arg(long, default_value = "0", value_parser = parse_seconds)]
    wait_min: Duration,

    /// Maximum pause between a user's requests, in seconds.
    #[arg(long, default_value = "0", value_parser = parse_seconds)]
    wait_max: Duration,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value = "60", value_parser = parse_seconds)]
    request_timeout: Duration,

    /// Print the final report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("`{raw}`: {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let format = LogFormat::from_env().unwrap_or_default();
    // Logs go to stderr so the report on stdout can be piped.
    let subscriber = get_subscriber(
        "pulse-load".into(),
        "pulse=info".into(),
        format,
        std::io::stderr,
    );
    if let Err(e) = init_subscriber(subscriber) {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    let profile = LoadProfile {
        host: cli.host,
        users: cli.users,
        spawn_rate: cli.spawn_rate,
        run_time: cli.run_time,
        wait: WaitTime::between(cli.wait_min, cli.wait_max),
        request_timeout: cli.request_timeout,
    };

    let shutdown = CancellationToken::new();
    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping");
            ctrl_c_token.cancel();
        }
    });

    let report = match run(&profile, &default_tasks(), shutdown).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Load test could not start");
            return ExitCode::from(2);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!(error = %e, "Failed to serialize report");
                return ExitCode::from(2);
            }
        }
    } else {
        println!("{report}");
    }

    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
