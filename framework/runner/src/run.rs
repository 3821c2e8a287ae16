use crate::definition::{SweepDefinition, SweepDefinitionBuilder};
use crate::invoke::{Invoke, ProcessInvoker};
use crate::progress::SweepProgress;
use crate::report::SweepReport;
use crate::sweep::Sweep;
use crate::types::BenchSweepResult;

/// Run the sweep, launching the benchmark executable for every (workload, variant) pair.
///
/// Returns an error only for configuration problems found before the first run. Failed runs are
/// logged and recorded in the returned [SweepReport].
pub fn run(definition: SweepDefinitionBuilder) -> BenchSweepResult<SweepReport> {
    run_with_invoker(definition, |definition| {
        ProcessInvoker::new(definition.executable.clone())
    })
}

/// Run the sweep with a custom [Invoke] implementation, created once the definition is valid.
pub fn run_with_invoker<I, F>(
    definition: SweepDefinitionBuilder,
    make_invoker: F,
) -> BenchSweepResult<SweepReport>
where
    I: Invoke,
    F: FnOnce(&SweepDefinition) -> I,
{
    let definition = definition.build()?;

    log::info!(
        "Running sweep '{}': {} workloads, '{}' then '{}'",
        definition.name,
        definition.workloads.len(),
        definition.comparison.baseline.tag(),
        definition.comparison.candidate.tag()
    );
    for variant in definition.comparison.ordered() {
        if !variant.working_dir().is_dir() {
            log::warn!(
                "Working directory '{}' for variant '{}' does not exist, its runs will fail",
                variant.working_dir().display(),
                variant.tag()
            );
        }
    }

    let mut invoker = make_invoker(&definition);
    let progress = SweepProgress::new(
        definition.workloads.len() * definition.comparison.ordered().len(),
        !definition.no_progress,
    );

    let sweep = Sweep::new(definition.workloads, definition.roots, definition.defaults)
        .with_extra_args(definition.extra_args);
    let report = sweep.run_comparison(&definition.comparison, &mut invoker, &progress);

    report.log_summary();

    Ok(report)
}
