use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use bench_sweep_core::prelude::{WorkloadSpec, WorkloadSpecBuilder};
use serde::Deserialize;

use crate::types::BenchSweepResult;

/// A workload list read from TOML, for example:
///
/// ```toml
/// [[workload]]
/// name = "bulkload"
/// has_duration = false
///
/// [[workload]]
/// name = "readwhilewriting"
/// env = { MB_WRITE_PER_SEC = "2" }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkloadFile {
    #[serde(default)]
    workload: Vec<WorkloadEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkloadEntry {
    name: String,
    #[serde(default = "default_has_duration")]
    has_duration: bool,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
}

fn default_has_duration() -> bool {
    true
}

impl From<WorkloadEntry> for WorkloadSpecBuilder {
    fn from(entry: WorkloadEntry) -> Self {
        let mut builder = WorkloadSpec::builder(entry.name)
            .with_duration(entry.has_duration)
            .with_args(entry.args);
        for (key, value) in entry.env {
            builder = builder.with_env(key, value);
        }
        builder
    }
}

/// Parse a TOML workload list, keeping the order the workloads are listed in.
pub fn parse_workloads(content: &str) -> BenchSweepResult<Vec<WorkloadSpecBuilder>> {
    let file: WorkloadFile = toml::from_str(content).context("Failed to parse workload file")?;

    Ok(file.workload.into_iter().map(Into::into).collect())
}

/// Read and parse a TOML workload list from `path`.
pub fn load_workloads(path: &Path) -> BenchSweepResult<Vec<WorkloadSpecBuilder>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workload file '{}'", path.display()))?;

    parse_workloads(&content).with_context(|| format!("Invalid workload file '{}'", path.display()))
}
