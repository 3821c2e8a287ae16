use crate::cli::BenchSweepCli;
use clap::Parser;

/// Initialise the CLI and logging for the sweep runner.
pub fn init() -> BenchSweepCli {
    logger(env_logger::Env::default()).init();

    BenchSweepCli::parse()
}

/// Logs at info level unless the filter variable in `env` says otherwise, so that run failures
/// and the sweep summary are shown by default.
fn logger(env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("info"))
}
