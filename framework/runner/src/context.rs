use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything resolved for one (workload, variant) run.
///
/// Created fresh for each run by [crate::environment::RunEnvironmentBuilder::build] and dropped
/// once the benchmark process has exited. Nothing in here is shared with any other run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub(crate) workload: String,
    pub(crate) variant: String,
    pub(crate) db_dir: PathBuf,
    pub(crate) wal_dir: PathBuf,
    pub(crate) output_dir: PathBuf,
    pub(crate) env: BTreeMap<String, String>,
    pub(crate) working_dir: PathBuf,
}

impl RunContext {
    pub fn workload(&self) -> &str {
        &self.workload
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn db_dir(&self) -> &Path {
        &self.db_dir
    }

    pub fn wal_dir(&self) -> &Path {
        &self.wal_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The environment that is set on the benchmark process, on top of the inherited environment.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Mutable access for callers that want to adjust a single run, it does not affect any other
    /// run or the workload definition.
    pub fn env_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.env
    }

    /// The directory the benchmark executable is launched from.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}
