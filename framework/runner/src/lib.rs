mod cli;
mod context;
mod definition;
mod environment;
mod error;
mod init;
mod invoke;
mod progress;
mod provision;
mod report;
mod run;
mod sweep;
mod types;
mod workload_file;

pub mod prelude {
    pub use bench_sweep_core::prelude::*;

    pub use crate::cli::BenchSweepCli;
    pub use crate::context::RunContext;
    pub use crate::definition::{SweepDefinition, SweepDefinitionBuilder};
    pub use crate::environment::{
        DirectoryRoots, EnvDefaults, RunEnvironmentBuilder, CACHE_SIZE_ENV, DB_DIR_ENV,
        NUM_KEYS_ENV, OUTPUT_DIR_ENV, WAL_DIR_ENV,
    };
    pub use crate::error::{RootsError, RunError};
    pub use crate::invoke::{Invoke, ProcessExit, ProcessInvoker, DEFAULT_EXECUTABLE};
    pub use crate::progress::SweepProgress;
    pub use crate::provision::{provision, DirectoryRole};
    pub use crate::report::{RunOutcome, RunRecord, SweepReport};
    pub use crate::run::{run, run_with_invoker};
    pub use crate::sweep::{Sweep, SweepPhase};
    pub use crate::types::BenchSweepResult;
    pub use crate::workload_file::{load_workloads, parse_workloads};
}
