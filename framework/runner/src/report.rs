use std::time::Duration;

use chrono::{DateTime, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::RunError;
use crate::invoke::ProcessExit;

/// What happened to a single (workload, variant) run.
#[derive(Debug)]
pub enum RunOutcome {
    Succeeded,
    /// The benchmark ran but did not exit successfully. `None` if it was terminated without an
    /// exit code.
    ExitedNonZero(Option<i32>),
    /// The run never started, either provisioning failed or the executable could not be launched.
    Failed(RunError),
}

impl From<ProcessExit> for RunOutcome {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => RunOutcome::Succeeded,
            ProcessExit::Code(code) => RunOutcome::ExitedNonZero(Some(code)),
            ProcessExit::Terminated => RunOutcome::ExitedNonZero(None),
        }
    }
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded)
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Succeeded => write!(f, "ok"),
            RunOutcome::ExitedNonZero(Some(code)) => write!(f, "exit code {code}"),
            RunOutcome::ExitedNonZero(None) => write!(f, "terminated"),
            RunOutcome::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// The record of one run, kept in memory until the sweep summary has been logged.
#[derive(Debug)]
pub struct RunRecord {
    pub workload: String,
    pub variant: String,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub outcome: RunOutcome,
}

/// Every run of a sweep, in the order they were executed.
#[derive(Debug, Default)]
pub struct SweepReport {
    records: Vec<RunRecord>,
}

#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Variant")]
    variant: String,
    #[tabled(rename = "Started")]
    started_at: String,
    #[tabled(rename = "Elapsed", display = "hms")]
    elapsed: Duration,
    #[tabled(rename = "Outcome")]
    outcome: String,
}

fn hms(elapsed: &Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

impl SweepReport {
    pub(crate) fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn failures(&self) -> impl Iterator<Item = &RunRecord> {
        self.records.iter().filter(|r| !r.outcome.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn to_table(&self) -> String {
        let rows = self
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| RunRow {
                index: index + 1,
                workload: record.workload.clone(),
                variant: record.variant.clone(),
                started_at: record.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                elapsed: record.elapsed,
                outcome: record.outcome.to_string(),
            })
            .collect::<Vec<_>>();

        let mut table = Table::new(rows);
        table.with(Style::modern());
        table.to_string()
    }

    /// Log the outcome of every run. Failures are logged again at error level so they stand out.
    pub fn log_summary(&self) {
        let failed = self.failures().count();
        log::info!(
            "Sweep finished, {} of {} runs succeeded\n{}",
            self.records.len() - failed,
            self.records.len(),
            self.to_table()
        );

        for record in self.failures() {
            log::error!(
                "Run {}@{} did not succeed: {}",
                record.workload,
                record.variant,
                record.outcome
            );
        }
    }
}
