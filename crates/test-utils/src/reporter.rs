use std::sync::{Arc, Mutex};

use jobdag::report::{JobReport, Reporter, RunSummary};

/// What a [`RecordingReporter`] saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Finished(JobReport),
    Skipped(String),
    RunFinished(RunSummary),
}

/// A `Reporter` that records every callback.
///
/// Cloning shares the log, so a test can keep one handle while the
/// dispatcher owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<JobReport> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportEvent::Finished(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ReportEvent::Skipped(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Names of finished jobs in completion order.
    pub fn finished_names(&self) -> Vec<String> {
        self.finished().into_iter().map(|r| r.job).collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn job_finished(&mut self, report: &JobReport) {
        self.push(ReportEvent::Finished(report.clone()));
    }

    fn job_skipped(&mut self, job: &str) {
        self.push(ReportEvent::Skipped(job.to_string()));
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        self.push(ReportEvent::RunFinished(*summary));
    }
}
