/// Recommended error type for a sweep binary's `main` function and for configuration code that
/// runs before the sweep starts. Per-run failures are reported as [crate::error::RunError] instead.
pub type BenchSweepResult<T> = anyhow::Result<T>;
