// src/report/stats.rs

use std::fmt;
use std::time::Duration;

use crate::report::{JobReport, Outcome, Reporter};

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// True when no job failed. Skipped jobs only exist downstream of a
    /// failure, so they never turn a run successful on their own.
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "jobs: {} passed, {} failed, {} skipped, {} total in {:.2}s",
            self.passed,
            self.failed,
            self.skipped,
            self.total(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Records every reported job and computes totals.
#[derive(Debug, Default)]
pub struct Stats {
    finished: Vec<JobReport>,
    skipped: Vec<String>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finished(&self) -> &[JobReport] {
        &self.finished
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Sum of the durations of every job that ran.
    pub fn busy_time(&self) -> Duration {
        self.finished.iter().map(|r| r.duration).sum()
    }

    pub fn summary(&self, elapsed: Duration) -> RunSummary {
        let passed = self
            .finished
            .iter()
            .filter(|r| r.outcome == Outcome::Passed)
            .count();

        RunSummary {
            passed,
            failed: self.finished.len() - passed,
            skipped: self.skipped.len(),
            elapsed,
        }
    }
}

impl Reporter for Stats {
    fn job_finished(&mut self, report: &JobReport) {
        self.finished.push(report.clone());
    }

    fn job_skipped(&mut self, job: &str) {
        self.skipped.push(job.to_string());
    }
}
