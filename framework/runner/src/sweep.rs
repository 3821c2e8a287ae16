use std::time::Instant;

use bench_sweep_core::prelude::{Comparison, Variant, WorkloadSpec};
use chrono::Utc;

use crate::environment::{DirectoryRoots, EnvDefaults, RunEnvironmentBuilder};
use crate::invoke::Invoke;
use crate::progress::SweepProgress;
use crate::report::{RunOutcome, RunRecord, SweepReport};

/// Where a comparison sweep is up to. Phases are always entered in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    RunningBaseline,
    RunningCandidate,
    Done,
}

impl SweepPhase {
    pub fn next(self) -> Self {
        match self {
            SweepPhase::RunningBaseline => SweepPhase::RunningCandidate,
            SweepPhase::RunningCandidate | SweepPhase::Done => SweepPhase::Done,
        }
    }

    /// The variant being run in this phase, [None] once the sweep is done.
    pub fn variant(self, comparison: &Comparison) -> Option<&Variant> {
        match self {
            SweepPhase::RunningBaseline => Some(&comparison.baseline),
            SweepPhase::RunningCandidate => Some(&comparison.candidate),
            SweepPhase::Done => None,
        }
    }
}

/// Runs every workload against every variant, one run at a time.
pub struct Sweep {
    workloads: Vec<WorkloadSpec>,
    roots: DirectoryRoots,
    defaults: EnvDefaults,
    extra_args: Vec<String>,
}

impl Sweep {
    pub fn new(workloads: Vec<WorkloadSpec>, roots: DirectoryRoots, defaults: EnvDefaults) -> Self {
        Self {
            workloads,
            roots,
            defaults,
            extra_args: Vec::new(),
        }
    }

    /// Arguments appended to every invocation, after the workload's own arguments.
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Run the whole workload list against the baseline, then the whole list again against the
    /// candidate.
    pub fn run_comparison<I: Invoke>(
        &self,
        comparison: &Comparison,
        invoker: &mut I,
        progress: &SweepProgress,
    ) -> SweepReport {
        let mut report = SweepReport::default();

        let mut phase = SweepPhase::RunningBaseline;
        while let Some(variant) = phase.variant(comparison) {
            log::info!("Entering phase {phase:?} with variant '{}'", variant.tag());
            self.run_variant(variant, invoker, progress, &mut report);
            phase = phase.next();
        }

        progress.finish();
        report
    }

    /// Run the whole workload list against each variant in turn, in the order given.
    ///
    /// Every run for one variant has finished before the first run of the next variant starts.
    pub fn run_variants<I: Invoke>(
        &self,
        variants: &[Variant],
        invoker: &mut I,
        progress: &SweepProgress,
    ) -> SweepReport {
        let mut report = SweepReport::default();
        for variant in variants {
            self.run_variant(variant, invoker, progress, &mut report);
        }

        progress.finish();
        report
    }

    fn run_variant<I: Invoke>(
        &self,
        variant: &Variant,
        invoker: &mut I,
        progress: &SweepProgress,
        report: &mut SweepReport,
    ) {
        log::info!(
            "Running {} workloads for variant '{}' from '{}'",
            self.workloads.len(),
            variant.tag(),
            variant.working_dir().display()
        );

        for workload in &self.workloads {
            let record = progress.run(workload.name(), variant.tag(), || {
                self.run_one(workload, variant, invoker)
            });
            report.push(record);
        }
    }

    /// Provision, configure and invoke a single run. Never fails, the outcome is recorded instead.
    fn run_one<I: Invoke>(
        &self,
        workload: &WorkloadSpec,
        variant: &Variant,
        invoker: &mut I,
    ) -> RunRecord {
        let started_at = Utc::now();
        let start = Instant::now();
        log::info!("Starting {}@{}", workload.name(), variant.tag());

        let outcome = match RunEnvironmentBuilder::new(&self.roots, self.defaults)
            .build(workload, variant)
        {
            Ok(ctx) => match invoker.invoke(&ctx, workload, &self.extra_args) {
                Ok(exit) => RunOutcome::from(exit),
                Err(e) => RunOutcome::Failed(e),
            },
            Err(e) => RunOutcome::Failed(e),
        };

        let elapsed = start.elapsed();
        match &outcome {
            RunOutcome::Succeeded => log::info!(
                "Finished {}@{} in {:.1}s",
                workload.name(),
                variant.tag(),
                elapsed.as_secs_f64()
            ),
            RunOutcome::ExitedNonZero(_) => log::error!(
                "{}@{} exited unsuccessfully after {:.1}s: {outcome}",
                workload.name(),
                variant.tag(),
                elapsed.as_secs_f64()
            ),
            RunOutcome::Failed(e) => log::error!(
                "{}@{} could not be run, continuing with the next workload: {e}",
                workload.name(),
                variant.tag()
            ),
        }

        RunRecord {
            workload: workload.name().to_string(),
            variant: variant.tag().to_string(),
            started_at,
            elapsed,
            outcome,
        }
    }
}
