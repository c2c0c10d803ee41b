// src/report/ui.rs

//! Line-oriented progress output.
//!
//! ```text
//! PASSED: 'build' slot:0 exitcode:0
//! FAILED: 'lint' slot:recycled exitcode:1
//! FAILED: 'fetch' slot:1 exitcode:n/a
//! SKIPPED: 'deploy'
//! ```
//!
//! A completion is shown with slot `recycled` when it ran in the same slot
//! as the completion printed just before it. `n/a` replaces the exit code of
//! a job that never started.

use std::io::{self, Stdout, Write};

use tracing::warn;

use crate::report::{JobReport, Reporter, RunSummary};

pub struct Ui<W: Write + Send> {
    out: W,
    last_slot: Option<usize>,
}

impl Ui<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Ui<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_slot: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(line).and_then(|_| self.out.write_all(b"\n")) {
            warn!(error = %e, "failed to write progress line");
        }
    }
}

impl<W: Write + Send> Reporter for Ui<W> {
    fn job_finished(&mut self, report: &JobReport) {
        let slot = if self.last_slot == Some(report.slot) {
            "recycled".to_string()
        } else {
            report.slot.to_string()
        };
        self.last_slot = Some(report.slot);

        let exit_code = report
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "n/a".to_string());

        self.emit(format_args!(
            "{}: '{}' slot:{} exitcode:{}",
            report.outcome, report.job, slot, exit_code
        ));
    }

    fn job_skipped(&mut self, job: &str) {
        self.emit(format_args!("SKIPPED: '{job}'"));
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        self.emit(format_args!("{summary}"));
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "failed to flush progress output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Outcome;
    use std::path::PathBuf;
    use std::time::Duration;

    fn report(job: &str, slot: usize, exit_code: Option<i32>) -> JobReport {
        JobReport {
            job: job.to_string(),
            exit_code,
            slot,
            outcome: if exit_code == Some(0) {
                Outcome::Passed
            } else {
                Outcome::Failed
            },
            duration: Duration::ZERO,
            output: PathBuf::from(slot.to_string()),
        }
    }

    #[test]
    fn renders_pass_fail_skip_and_recycled_slots() {
        let mut ui = Ui::new(Vec::new());
        ui.job_finished(&report("job 0", 0, Some(0)));
        ui.job_finished(&report("job 1", 0, Some(1)));
        ui.job_finished(&report("job 42", 1, Some(42)));
        ui.job_finished(&report("command_not_found arg", 2, None));
        ui.job_skipped("after");

        let text = String::from_utf8(ui.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "PASSED: 'job 0' slot:0 exitcode:0",
                "FAILED: 'job 1' slot:recycled exitcode:1",
                "FAILED: 'job 42' slot:1 exitcode:42",
                "FAILED: 'command_not_found arg' slot:2 exitcode:n/a",
                "SKIPPED: 'after'",
            ]
        );
    }

    #[test]
    fn run_summary_is_the_last_line() {
        let mut ui = Ui::new(Vec::new());
        ui.run_finished(&RunSummary {
            passed: 2,
            failed: 0,
            skipped: 0,
            elapsed: Duration::from_millis(250),
        });
        let text = String::from_utf8(ui.into_inner()).unwrap();
        assert_eq!(text, "jobs: 2 passed, 0 failed, 0 skipped, 2 total in 0.25s\n");
    }
}
