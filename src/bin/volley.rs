use volley::*;

use anyhow::Context;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the target (only use on targets you are authorized to test)
    #[arg(default_value = model::DEFAULT_URL)]
    url: String,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = model::DEFAULT_WORKERS)]
    workers: usize,

    /// Number of requests each worker sends
    #[arg(short, long, default_value_t = model::DEFAULT_REQUESTS_PER_WORKER)]
    requests: usize,

    /// Delay between two requests of the same worker, in milliseconds
    #[arg(short, long, default_value_t = model::DEFAULT_DELAY_MS)]
    delay_ms: u64,

    /// Per-request timeout in seconds; requests may hang forever without it
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<Args> for model::Config {
    fn from(args: Args) -> Self {
        Self {
            url: args.url,
            workers: args.workers,
            requests_per_worker: args.requests,
            delay: Duration::from_millis(args.delay_ms),
            timeout: args.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init(args.verbose as usize).context("failed to initialize logging")?;

    let config = model::Config::from(args);
    config.validate()?;
    log::debug!("{config:?}");

    let pb = dispatcher::progress_bar(&config)?;
    dispatcher::run(&config, pb)
        .await
        .context("load test aborted")?;

    Ok(())
}
