use crate::model::{Config, Summary, WorkerReport};
use crate::worker::worker;
use crate::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;

/// Progress bar sized for the whole run. Hidden automatically when stderr is
/// not a terminal.
pub fn progress_bar(config: &Config) -> Result<ProgressBar> {
    let sty = ProgressStyle::with_template(
        "{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} requests",
    )?
    .progress_chars("=> ");
    let pb = ProgressBar::new(config.max_requests());
    pb.set_style(sty);
    Ok(pb)
}

pub fn summarize(reports: &[WorkerReport]) -> Summary {
    reports.iter().fold(
        Summary {
            workers: reports.len(),
            ..Summary::default()
        },
        |mut acc, r| {
            acc.attempted += r.attempted();
            acc.responses += r.statuses().len();
            if r.is_failed() {
                acc.failed_workers += 1;
            }
            acc
        },
    )
}

/// Launches `config.workers` identical workers and waits for every one of
/// them before returning their reports, ordered by rank.
pub async fn run(config: &Config, pb: ProgressBar) -> Result<Vec<WorkerReport>> {
    config.validate()?;

    pb.suspend(|| {
        println!(
            "{} Starting load test on {} (authorized testing only)",
            style("[!]").yellow().bold(),
            config.url
        );
        println!(
            "{} Using {} workers with {} requests each",
            style("[!]").yellow().bold(),
            config.workers,
            config.requests_per_worker
        );
    });

    let mut set = JoinSet::new();
    for rank in 0..config.workers {
        set.spawn(worker(rank, config.clone(), pb.clone()));
    }

    let mut reports = Vec::with_capacity(config.workers);
    while let Some(res) = set.join_next().await {
        reports.push(res?);
    }
    reports.sort_by_key(|r| r.rank);
    pb.finish_and_clear();

    let summary = summarize(&reports);
    log::info!("{summary:?}");
    println!(
        "{} Load test completed: {} requests attempted, {} of {} workers failed",
        style("[!]").yellow().bold(),
        summary.attempted,
        summary.failed_workers,
        summary.workers
    );

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RequestOutcome, RequestRecord};
    use std::time::Duration;

    fn report(rank: usize, outcomes: Vec<RequestOutcome>) -> WorkerReport {
        let mut report = WorkerReport::new(rank);
        for (iteration, outcome) in outcomes.into_iter().enumerate() {
            report.records.push(RequestRecord {
                iteration,
                begin: chrono::Utc::now(),
                latency: Duration::ZERO,
                outcome,
            });
        }
        report
    }

    #[test]
    fn summarize_counts_failures_per_worker() {
        let reports = vec![
            report(0, vec![RequestOutcome::Status(200); 3]),
            report(
                1,
                vec![
                    RequestOutcome::Status(200),
                    RequestOutcome::Failed("reset".into()),
                ],
            ),
            report(2, vec![RequestOutcome::Failed("refused".into())]),
        ];

        let summary = summarize(&reports);
        assert_eq!(
            summary,
            Summary {
                workers: 3,
                attempted: 6,
                responses: 4,
                failed_workers: 2,
            }
        );
    }

    #[test]
    fn progress_bar_spans_whole_run() {
        let config = Config {
            workers: 4,
            requests_per_worker: 25,
            ..Config::default()
        };
        let pb = progress_bar(&config).unwrap();
        assert_eq!(pb.length(), Some(100));
    }

    #[tokio::test]
    async fn invalid_config_spawns_nothing() {
        let config = Config {
            workers: 0,
            ..Config::default()
        };
        assert!(run(&config, ProgressBar::hidden()).await.is_err());
    }
}
