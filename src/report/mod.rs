// src/report/mod.rs

//! Per-job outcome reporting.
//!
//! The dispatcher pushes every terminal job through the [`Reporter`] trait.
//! [`Stats`] aggregates totals; [`Ui`] renders progress lines for humans.
//! Tests plug in their own reporter to observe a run.

pub mod stats;
pub mod ui;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::exec::ExecutionRecord;

pub use stats::{RunSummary, Stats};
pub use ui::Ui;

/// Pass/fail verdict of a job that ran (or tried to).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => f.write_str("PASSED"),
            Outcome::Failed => f.write_str("FAILED"),
        }
    }
}

/// Everything reported about one finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub job: String,
    /// `None` when the job never started.
    pub exit_code: Option<i32>,
    pub slot: usize,
    pub outcome: Outcome,
    pub duration: Duration,
    /// Capture file with the job's output.
    pub output: PathBuf,
}

impl From<&ExecutionRecord> for JobReport {
    fn from(record: &ExecutionRecord) -> Self {
        let outcome = if record.exit_code == Some(0) {
            Outcome::Passed
        } else {
            Outcome::Failed
        };

        Self {
            job: record.job.clone(),
            exit_code: record.exit_code,
            slot: record.slot,
            outcome,
            duration: record.duration,
            output: record.output.clone(),
        }
    }
}

/// Sink for job outcomes.
///
/// Every job in a run is reported exactly once, either through
/// `job_finished` or `job_skipped`.
pub trait Reporter: Send {
    fn job_finished(&mut self, report: &JobReport);

    /// The job will never run because an ancestor failed.
    fn job_skipped(&mut self, job: &str);

    fn run_finished(&mut self, _summary: &RunSummary) {}
}
