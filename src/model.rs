use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_WORKERS: usize = 50;
pub const DEFAULT_REQUESTS_PER_WORKER: usize = 100;
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Run parameters. Built once before any worker starts and cloned into each
/// of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target address. Not parsed up front: a malformed URL shows up as a
    /// request failure in every worker.
    pub url: String,
    pub workers: usize,
    pub requests_per_worker: usize,
    pub delay: Duration,
    /// Per-request timeout. `None` lets a request block indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            workers: DEFAULT_WORKERS,
            requests_per_worker: DEFAULT_REQUESTS_PER_WORKER,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            timeout: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("worker count must be positive".into()));
        }
        if self.requests_per_worker == 0 {
            return Err(Error::InvalidConfig(
                "requests per worker must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Upper bound on the number of requests a run can issue.
    pub fn max_requests(&self) -> u64 {
        (self.workers as u64).saturating_mul(self.requests_per_worker as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Status(u16),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub iteration: usize,
    pub begin: chrono::DateTime<chrono::Utc>,
    pub latency: Duration,
    pub outcome: RequestOutcome,
}

/// What one worker did. A failure is always the last record, or the only
/// thing set when the worker never got to send anything.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub rank: usize,
    pub records: Vec<RequestRecord>,
    pub setup_error: Option<String>,
}

impl WorkerReport {
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            records: Vec::new(),
            setup_error: None,
        }
    }

    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    pub fn statuses(&self) -> Vec<u16> {
        self.records
            .iter()
            .filter_map(|r| match r.outcome {
                RequestOutcome::Status(code) => Some(code),
                RequestOutcome::Failed(_) => None,
            })
            .collect()
    }

    pub fn failure(&self) -> Option<&str> {
        if let Some(e) = &self.setup_error {
            return Some(e);
        }
        match self.records.last().map(|r| &r.outcome) {
            Some(RequestOutcome::Failed(e)) => Some(e),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure().is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub workers: usize,
    pub attempted: usize,
    pub responses: usize,
    pub failed_workers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iteration: usize, outcome: RequestOutcome) -> RequestRecord {
        RequestRecord {
            iteration,
            begin: chrono::Utc::now(),
            latency: Duration::ZERO,
            outcome,
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_requests(), 5000);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn zero_workers_rejected() {
        let config = Config {
            workers: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn zero_requests_rejected() {
        let config = Config {
            requests_per_worker: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn report_failure_is_last_record() {
        let mut report = WorkerReport::new(3);
        report.records.push(record(0, RequestOutcome::Status(200)));
        report.records.push(record(1, RequestOutcome::Status(503)));
        assert!(!report.is_failed());

        report
            .records
            .push(record(2, RequestOutcome::Failed("connection refused".into())));
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.statuses(), vec![200, 503]);
        assert_eq!(report.failure(), Some("connection refused"));
    }

    #[test]
    fn setup_error_counts_as_failure() {
        let mut report = WorkerReport::new(0);
        report.setup_error = Some("no tls backend".into());
        assert_eq!(report.attempted(), 0);
        assert!(report.is_failed());
    }
}
