use bench_sweep_runner::prelude::*;

/// Throttle for the background writer in the mixed read/write workloads, in MB/s.
const MIXED_WRITE_RATE_MB_PER_SEC: &str = "2";

fn battery() -> Vec<WorkloadSpecBuilder> {
    vec![
        WorkloadSpec::builder("bulkload").run_to_completion(),
        WorkloadSpec::builder("readrandom"),
        WorkloadSpec::builder("multireadrandom").with_arg("--multiread_batched"),
        WorkloadSpec::builder("fwdrange"),
        WorkloadSpec::builder("revrange"),
        WorkloadSpec::builder("overwrite"),
        WorkloadSpec::builder("readwhilewriting")
            .with_env("MB_WRITE_PER_SEC", MIXED_WRITE_RATE_MB_PER_SEC),
        WorkloadSpec::builder("fwdrangewhilewriting")
            .with_env("MB_WRITE_PER_SEC", MIXED_WRITE_RATE_MB_PER_SEC),
        WorkloadSpec::builder("revrangewhilewriting")
            .with_env("MB_WRITE_PER_SEC", MIXED_WRITE_RATE_MB_PER_SEC),
    ]
}

fn main() -> BenchSweepResult<()> {
    let builder =
        SweepDefinitionBuilder::new_with_init(env!("CARGO_PKG_NAME")).with_workloads(battery());

    run(builder)?;

    Ok(())
}
