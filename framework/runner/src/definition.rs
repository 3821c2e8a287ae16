use std::path::PathBuf;

use anyhow::{bail, Context};
use bench_sweep_core::prelude::{
    ensure_unique_names, Comparison, Variant, WorkloadSpec, WorkloadSpecBuilder,
};

use crate::cli::BenchSweepCli;
use crate::environment::{DirectoryRoots, EnvDefaults};
use crate::init::init;
use crate::types::BenchSweepResult;
use crate::workload_file::load_workloads;

/// The builder for a sweep definition.
///
/// This must be used at the start of a sweep binary to declare the workload battery that you want
/// to compare across the two builds.
pub struct SweepDefinitionBuilder {
    /// The name of the sweep, used in logs.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    /// This value is initialised for you by [SweepDefinitionBuilder::new_with_init].
    #[doc(hidden)]
    cli: BenchSweepCli,
    /// The workloads, in the order they run for each variant.
    workloads: Vec<WorkloadSpecBuilder>,
}

/// A validated sweep, ready to run.
#[derive(Debug)]
pub struct SweepDefinition {
    pub name: String,
    pub workloads: Vec<WorkloadSpec>,
    pub comparison: Comparison,
    pub roots: DirectoryRoots,
    pub defaults: EnvDefaults,
    pub executable: PathBuf,
    pub extra_args: Vec<String>,
    pub no_progress: bool,
}

impl SweepDefinitionBuilder {
    /// Initialise logging and parse the command line, then create a new sweep definition.
    pub fn new_with_init(name: &str) -> Self {
        Self::new(name, init())
    }

    /// Create a new sweep definition from an already parsed command line.
    pub fn new(name: &str, cli: BenchSweepCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            workloads: Vec::new(),
        }
    }

    /// Append a workload to the battery.
    pub fn with_workload(mut self, workload: WorkloadSpecBuilder) -> Self {
        self.workloads.push(workload);
        self
    }

    /// Append several workloads to the battery, keeping their order.
    pub fn with_workloads(mut self, workloads: impl IntoIterator<Item = WorkloadSpecBuilder>) -> Self {
        self.workloads.extend(workloads);
        self
    }

    /// Validate the definition against the command line options.
    ///
    /// All configuration errors are reported here, before any run has started.
    pub fn build(self) -> BenchSweepResult<SweepDefinition> {
        let cli = self.cli;

        let builders = match &cli.workloads {
            Some(path) => {
                log::info!("Loading workloads from '{}'", path.display());
                load_workloads(path)?
            }
            None => self.workloads,
        };

        let workloads = builders
            .into_iter()
            .map(WorkloadSpecBuilder::build)
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid workload definition")?;
        ensure_unique_names(&workloads).context("Invalid workload list")?;

        let workloads = select_workloads(workloads, &cli.only)?;
        if workloads.is_empty() {
            bail!("No workloads to run for sweep '{}'", self.name);
        }

        let comparison = Comparison::new(
            Variant::new(cli.baseline_tag, cli.baseline_dir).context("Invalid baseline variant")?,
            Variant::new(cli.candidate_tag, cli.candidate_dir)
                .context("Invalid candidate variant")?,
        );
        if comparison.baseline.tag() == comparison.candidate.tag() {
            bail!(
                "Baseline and candidate must use different tags, both are '{}'",
                comparison.baseline.tag()
            );
        }

        let roots = DirectoryRoots {
            db: cli.db_root,
            wal: cli.wal_root,
            output: cli.out_root,
        };
        roots.ensure_disjoint().context("Invalid directory roots")?;

        Ok(SweepDefinition {
            name: self.name,
            workloads,
            comparison,
            roots,
            defaults: EnvDefaults {
                num_keys: cli.num_keys,
                cache_size: cli.cache_size,
                duration_s: cli.duration,
            },
            executable: cli.executable,
            extra_args: cli.extra_args,
            no_progress: cli.no_progress,
        })
    }
}

/// Keep only the workloads named in `only`, in their original order. An empty filter keeps all.
fn select_workloads(
    workloads: Vec<WorkloadSpec>,
    only: &[String],
) -> BenchSweepResult<Vec<WorkloadSpec>> {
    if only.is_empty() {
        return Ok(workloads);
    }

    for name in only {
        if !workloads.iter().any(|w| w.name() == name) {
            bail!("Unknown workload '{name}' requested with --only");
        }
    }

    Ok(workloads
        .into_iter()
        .filter(|w| only.iter().any(|name| name == w.name()))
        .collect())
}
