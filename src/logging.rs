use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::Result;

/// Installs the global logger. `RUST_LOG`, when set, wins over `verbosity`.
pub fn init(verbosity: usize) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Off)
        .filter_module("volley", level)
        .filter_module("reqwest", level)
        .parse_env(Env::default())
        .try_init()?;

    Ok(())
}
