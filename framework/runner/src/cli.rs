use std::path::PathBuf;

use clap::Parser;

use crate::environment::{DEFAULT_CACHE_SIZE, DEFAULT_DURATION_S, DEFAULT_NUM_KEYS};
use crate::invoke::DEFAULT_EXECUTABLE;

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct BenchSweepCli {
    /// Root directory for the database directories, each run uses `<db-root>/<variant>/<workload>`
    #[arg(long, env = "BENCH_SWEEP_DB_ROOT", default_value = "/data/db")]
    pub db_root: PathBuf,

    /// Root directory for the write-ahead-log directories
    #[arg(long, env = "BENCH_SWEEP_WAL_ROOT", default_value = "/data/wal")]
    pub wal_root: PathBuf,

    /// Root directory for the benchmark output directories
    #[arg(long, env = "BENCH_SWEEP_OUT_ROOT", default_value = "/data/out")]
    pub out_root: PathBuf,

    /// Working directory of the baseline build, the benchmark executable is launched from here
    #[arg(long, default_value = "../rocksdb")]
    pub baseline_dir: PathBuf,

    /// Working directory of the candidate build
    #[arg(long, default_value = ".")]
    pub candidate_dir: PathBuf,

    /// Tag for the baseline build, used as a directory name under each root
    #[arg(long, default_value = "ori")]
    pub baseline_tag: String,

    /// Tag for the candidate build
    #[arg(long, default_value = "cst")]
    pub candidate_tag: String,

    /// Path to the benchmark executable, relative to each build's working directory
    #[arg(long, default_value = DEFAULT_EXECUTABLE)]
    pub executable: PathBuf,

    /// The number of seconds each duration-bounded workload runs for
    #[arg(long, default_value_t = DEFAULT_DURATION_S)]
    pub duration: u64,

    /// The size of the key space
    #[arg(long, default_value_t = DEFAULT_NUM_KEYS)]
    pub num_keys: u64,

    /// The cache budget in bytes
    #[arg(long, default_value_t = DEFAULT_CACHE_SIZE)]
    pub cache_size: u64,

    /// Replace the built-in workload list with the workloads in this TOML file
    #[arg(long)]
    pub workloads: Option<PathBuf>,

    /// Only run the named workloads. Can be given multiple times, for example
    /// `--only readrandom --only overwrite`. Workloads still run in list order.
    #[arg(long)]
    pub only: Vec<String>,

    /// Do not show a progress bar on the CLI.
    ///
    /// Recommended when the output is captured to a file rather than watched.
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Extra arguments passed to every run of the benchmark executable, after `--`
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}
