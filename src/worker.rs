use crate::model::{Config, RequestOutcome, RequestRecord, WorkerReport};
use chrono::Utc;
use console::style;
use indicatif::ProgressBar;
use std::time::Instant;

fn build_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Sends up to `config.requests_per_worker` GETs to `config.url`, one at a
/// time, sleeping `config.delay` after each. The first failed request ends
/// the loop; its error is recorded in the report rather than returned.
pub async fn worker(rank: usize, config: Config, pb: ProgressBar) -> WorkerReport {
    let mut report = WorkerReport::new(rank);

    let client = match build_client(&config) {
        Ok(client) => client,
        Err(e) => {
            log::warn!("worker {rank}: could not build http client: {e}");
            pb.suspend(|| println!("worker {rank}: {} {e}", style("error:").red()));
            report.setup_error = Some(e.to_string());
            return report;
        }
    };

    log::debug!("worker {rank}: started");

    for iteration in 0..config.requests_per_worker {
        let begin = Utc::now();
        let sent = Instant::now();
        let response = client.get(&config.url).send().await;
        let latency = sent.elapsed();
        pb.inc(1);

        let outcome = match response {
            Ok(res) => {
                let status = res.status();
                log::trace!("worker {rank}: #{iteration} {status} in {latency:?}");
                pb.suspend(|| {
                    println!(
                        "worker {rank}: sent request, status: {}",
                        status.as_u16()
                    )
                });
                RequestOutcome::Status(status.as_u16())
            }
            Err(e) => {
                log::warn!("worker {rank}: request #{iteration} failed, stopping: {e}");
                pb.suspend(|| println!("worker {rank}: {} {e}", style("error:").red()));
                RequestOutcome::Failed(e.to_string())
            }
        };

        let failed = matches!(outcome, RequestOutcome::Failed(_));
        report.records.push(RequestRecord {
            iteration,
            begin,
            latency,
            outcome,
        });
        if failed {
            break;
        }

        tokio::time::sleep(config.delay).await;
    }

    log::debug!(
        "worker {rank}: finished after {} requests",
        report.attempted()
    );
    report
}
