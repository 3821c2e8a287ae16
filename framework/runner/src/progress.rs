use indicatif::{ProgressBar, ProgressStyle};

/// Shows how many runs of the sweep have completed and which one is in progress.
pub struct SweepProgress {
    pb: ProgressBar,
}

impl SweepProgress {
    /// A progress bar over `total_runs` runs, drawn to stderr unless `enabled` is false.
    pub fn new(total_runs: usize, enabled: bool) -> Self {
        if !enabled {
            return Self {
                pb: ProgressBar::hidden(),
            };
        }

        let pb = ProgressBar::new(total_runs as u64);
        match ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} runs [{elapsed_precise}] {msg}",
        ) {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => log::warn!("Failed to set progress style: {e}"),
        }

        Self { pb }
    }

    pub fn hidden() -> Self {
        Self::new(0, false)
    }

    /// Run `f` as the next run of the sweep.
    ///
    /// The bar is cleared from the terminal while `f` runs, so log lines and the benchmark's own
    /// output are not interleaved with it, and redrawn with the new position afterwards. `f` must
    /// not call back into this progress bar.
    pub fn run<R>(&self, workload: &str, variant: &str, f: impl FnOnce() -> R) -> R {
        self.pb.set_message(format!("{workload}@{variant}"));
        let result = self.pb.suspend(f);
        self.pb.inc(1);
        result
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.pb.position()
    }
}
