use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;

/// Result of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A response with a status below 400 was fully received.
    Success { status: u16 },
    /// Transport error, timeout, or a 4xx/5xx status.
    Failure { error: String },
}

/// Concurrent request statistics, keyed by endpoint name (`GET /status`).
#[derive(Debug, Default)]
pub struct Stats {
    endpoints: DashMap<String, EndpointStats>,
    errors: DashMap<(String, String), u64>,
}

#[derive(Debug, Clone, Default)]
struct EndpointStats {
    requests: u64,
    failures: u64,
    total_ms: f64,
    min_ms: Option<f64>,
    max_ms: f64,
    /// Rounded response time (ms) -> occurrences.
    histogram: BTreeMap<u64, u64>,
}

impl EndpointStats {
    fn record(&mut self, elapsed_ms: f64, failed: bool) {
        self.requests += 1;
        if failed {
            self.failures += 1;
        }
        self.total_ms += elapsed_ms;
        self.min_ms = Some(self.min_ms.map_or(elapsed_ms, |min| min.min(elapsed_ms)));
        self.max_ms = self.max_ms.max(elapsed_ms);
        *self.histogram.entry(bucket(elapsed_ms)).or_default() += 1;
    }

    fn merge(&mut self, other: &EndpointStats) {
        self.requests += other.requests;
        self.failures += other.failures;
        self.total_ms += other.total_ms;
        self.min_ms = match (self.min_ms, other.min_ms) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_ms = self.max_ms.max(other.max_ms);
        for (&rt, &count) in &other.histogram {
            *self.histogram.entry(rt).or_default() += count;
        }
    }

    /// Walks the histogram from the slowest bucket down and returns the
    /// first bucket at which no more than `requests * fraction` requests
    /// remain below it.
    fn percentile(&self, fraction: f64) -> u64 {
        if self.requests == 0 {
            return 0;
        }
        let below = (self.requests as f64 * fraction) as u64;
        let mut seen = 0;
        for (&rt, &count) in self.histogram.iter().rev() {
            seen += count;
            if self.requests - seen <= below {
                return rt;
            }
        }
        0
    }

    fn summarize(&self, name: String, elapsed: Duration) -> EndpointSummary {
        let secs = elapsed.as_secs_f64();
        EndpointSummary {
            name,
            requests: self.requests,
            failures: self.failures,
            avg_ms: if self.requests == 0 {
                0.0
            } else {
                self.total_ms / self.requests as f64
            },
            min_ms: self.min_ms.unwrap_or(0.0),
            max_ms: self.max_ms,
            median_ms: self.percentile(0.5),
            p95_ms: self.percentile(0.95),
            rps: if secs > 0.0 {
                self.requests as f64 / secs
            } else {
                0.0
            },
        }
    }
}

/// Rounds a response time to keep the histogram small: exact below 100ms,
/// nearest 10ms below 1s, nearest 100ms above.
fn bucket(ms: f64) -> u64 {
    let ms = ms.round() as u64;
    if ms < 100 {
        ms
    } else if ms < 1_000 {
        (ms + 5) / 10 * 10
    } else {
        (ms + 50) / 100 * 100
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str, elapsed: Duration, outcome: &Outcome) {
        let elapsed_ms = elapsed.as_secs_f64() * 1_000.0;
        let failed = matches!(outcome, Outcome::Failure { .. });

        self.endpoints
            .entry(name.to_string())
            .or_default()
            .record(elapsed_ms, failed);

        if let Outcome::Failure { error } = outcome {
            *self
                .errors
                .entry((name.to_string(), error.clone()))
                .or_default() += 1;
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn report(&self, elapsed: Duration) -> StatsReport {
        let mut total = EndpointStats::default();
        let mut endpoints: Vec<EndpointSummary> = self
            .endpoints
            .iter()
            .map(|entry| {
                total.merge(entry.value());
                entry.value().summarize(entry.key().clone(), elapsed)
            })
            .collect();
        endpoints.sort_by(|a, b| a.name.cmp(&b.name));

        let mut failures: Vec<FailureSummary> = self
            .errors
            .iter()
            .map(|entry| {
                let (name, error) = entry.key();
                FailureSummary {
                    name: name.clone(),
                    error: error.clone(),
                    occurrences: *entry.value(),
                }
            })
            .collect();
        failures.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then_with(|| a.name.cmp(&b.name))
        });

        StatsReport {
            elapsed_secs: elapsed.as_secs_f64(),
            endpoints,
            total: total.summarize("Aggregated".to_string(), elapsed),
            failures,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointSummary {
    pub name: String,
    pub requests: u64,
    pub failures: u64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: u64,
    pub p95_ms: u64,
    pub rps: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureSummary {
    pub name: String,
    pub error: String,
    pub occurrences: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub elapsed_secs: f64,
    pub endpoints: Vec<EndpointSummary>,
    pub total: EndpointSummary,
    pub failures: Vec<FailureSummary>,
}

impl StatsReport {
    pub fn has_failures(&self) -> bool {
        self.total.failures > 0
    }

    pub fn endpoint(&self, name: &str) -> Option<&EndpointSummary> {
        self.endpoints.iter().find(|e| e.name == name)
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<24} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
            "Name", "# reqs", "# fails", "Avg", "Min", "Max", "Med", "95%", "req/s"
        )?;
        writeln!(f, "{}", "-".repeat(106))?;
        for row in &self.endpoints {
            write_row(f, row)?;
        }
        writeln!(f, "{}", "-".repeat(106))?;
        write_row(f, &self.total)?;

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures:")?;
            for failure in &self.failures {
                writeln!(
                    f,
                    "{:>9}  {}: {}",
                    failure.occurrences, failure.name, failure.error
                )?;
            }
        }

        write!(f, "\nRan for {:.1}s", self.elapsed_secs)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &EndpointSummary) -> fmt::Result {
    writeln!(
        f,
        "{:<24} {:>9} {:>9} {:>9.0} {:>9.0} {:>9.0} {:>9} {:>9} {:>9.2}",
        row.name,
        row.requests,
        row.failures,
        row.avg_ms,
        row.min_ms,
        row.max_ms,
        row.median_ms,
        row.p95_ms,
        row.rps
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok() -> Outcome {
        Outcome::Success { status: 200 }
    }

    #[test]
    fn buckets_round_by_magnitude() {
        assert_eq!(bucket(42.4), 42);
        assert_eq!(bucket(147.0), 150);
        assert_eq!(bucket(144.0), 140);
        assert_eq!(bucket(1_449.0), 1_400);
        assert_eq!(bucket(1_450.0), 1_500);
    }

    #[test]
    fn aggregates_per_endpoint_and_total() {
        let stats = Stats::new();
        stats.record("GET /", Duration::from_millis(10), &ok());
        stats.record("GET /", Duration::from_millis(30), &ok());
        stats.record("GET /status", Duration::from_millis(20), &ok());
        stats.record(
            "GET /status",
            Duration::from_millis(40),
            &Outcome::Failure {
                error: "HTTP 500 Internal Server Error".into(),
            },
        );

        let report = stats.report(Duration::from_secs(2));

        let home = report.endpoint("GET /").unwrap();
        assert_eq!(home.requests, 2);
        assert_eq!(home.failures, 0);
        assert!((home.avg_ms - 20.0).abs() < 1e-6);
        assert!((home.min_ms - 10.0).abs() < 1e-6);
        assert!((home.max_ms - 30.0).abs() < 1e-6);
        assert!((home.rps - 1.0).abs() < 1e-6);

        assert_eq!(report.total.name, "Aggregated");
        assert_eq!(report.total.requests, 4);
        assert_eq!(report.total.failures, 1);
        assert!((report.total.min_ms - 10.0).abs() < 1e-6);
        assert!((report.total.max_ms - 40.0).abs() < 1e-6);
        assert!(report.has_failures());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "GET /status");
        assert_eq!(report.failures[0].occurrences, 1);
    }

    #[test]
    fn percentiles_follow_histogram() {
        let stats = Stats::new();
        for ms in 1..=100 {
            stats.record("GET /", Duration::from_millis(ms), &ok());
        }
        let report = stats.report(Duration::from_secs(1));
        let row = report.endpoint("GET /").unwrap();
        assert_eq!(row.median_ms, 51);
        assert_eq!(row.p95_ms, 96);
    }

    #[test]
    fn single_request_is_every_percentile() {
        let stats = Stats::new();
        stats.record("GET /", Duration::from_millis(7), &ok());
        let report = stats.report(Duration::from_secs(1));
        let row = report.endpoint("GET /").unwrap();
        assert_eq!(row.median_ms, 7);
        assert_eq!(row.p95_ms, 7);
    }

    #[test]
    fn empty_report_has_zeroed_totals() {
        let report = Stats::new().report(Duration::ZERO);
        assert!(report.endpoints.is_empty());
        assert_eq!(report.total.requests, 0);
        assert_eq!(report.total.min_ms, 0.0);
        assert_eq!(report.total.rps, 0.0);
        assert!(!report.has_failures());
    }

    #[test]
    fn table_lists_every_endpoint_and_failures() {
        let stats = Stats::new();
        stats.record("GET /", Duration::from_millis(5), &ok());
        stats.record(
            "GET /status",
            Duration::from_millis(5),
            &Outcome::Failure {
                error: "connection refused".into(),
            },
        );
        let table = stats.report(Duration::from_secs(1)).to_string();

        assert!(table.contains("GET /status"));
        assert!(table.contains("Aggregated"));
        assert!(table.contains("Failures:"));
        assert!(table.contains("connection refused"));
    }
}
