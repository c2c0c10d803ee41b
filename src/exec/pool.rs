// src/exec/pool.rs

//! In-flight job executions.
//!
//! Each launched job runs as its own Tokio task inside a [`JoinSet`], so the
//! dispatcher can wait for whichever finishes first. Output goes to a
//! per-slot capture file that is truncated every time the slot is reused.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Child;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::dag::Job;
use crate::errors::{Error, JobdagError, Result};
use crate::exec::action::{Action, JobFn};
use crate::exec::command::{build_command, exit_code_of, spawn_error_line};

/// Result of one finished execution, as handed back by [`Pool::wait_any`].
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub job: String,
    pub slot: usize,
    /// `None` when the action never started.
    pub exit_code: Option<i32>,
    pub started_at: Instant,
    pub duration: Duration,
    /// Capture file holding the job's combined output.
    pub output: PathBuf,
}

/// Bookkeeping for a running execution, keyed by slot.
#[derive(Debug)]
struct Execution {
    job: String,
    started_at: Instant,
}

/// What a finished execution task returns.
#[derive(Debug)]
struct Completion {
    slot: usize,
    exit_code: Option<i32>,
}

#[derive(Debug)]
pub struct Pool {
    output_dir: PathBuf,
    running: JoinSet<Completion>,
    active: HashMap<usize, Execution>,
}

impl Pool {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            running: JoinSet::new(),
            active: HashMap::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            JobdagError::ConfigError(format!(
                "cannot create output directory {:?}: {e}",
                self.output_dir
            ))
        })
    }

    /// Path of the capture file for `slot`.
    pub fn capture_path(&self, slot: usize) -> PathBuf {
        self.output_dir.join(slot.to_string())
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Start `job` in `slot`.
    ///
    /// Failing to start the job's command is not an error here: it shows up
    /// later from [`Pool::wait_any`] as a completion without an exit code,
    /// with the spawn error written to the capture file.
    pub fn launch(&mut self, job: &Job, slot: usize) -> Result<()> {
        if self.active.contains_key(&slot) {
            return Err(JobdagError::SlotInUse { slot });
        }

        let name = job.name.clone();
        let action = job.action.clone();
        let capture = self.capture_path(slot);

        info!(job = %name, slot, action = action.describe(), "launching job");

        self.running.spawn(async move {
            let exit_code = run_action(&name, &action, &capture).await;
            Completion { slot, exit_code }
        });
        self.active.insert(
            slot,
            Execution {
                job: job.name.clone(),
                started_at: Instant::now(),
            },
        );

        Ok(())
    }

    /// Wait for the next execution to finish and remove it from the pool.
    ///
    /// Returns `Ok(None)` when nothing is in flight. When several executions
    /// finish together each one is returned exactly once, in no particular
    /// order.
    pub async fn wait_any(&mut self) -> Result<Option<ExecutionRecord>> {
        let Some(joined) = self.running.join_next().await else {
            return Ok(None);
        };

        let completion = joined.map_err(|e| Error::from(e).context("execution task failed"))?;
        let execution = self
            .active
            .remove(&completion.slot)
            .ok_or(JobdagError::SlotNotHeld {
                slot: completion.slot,
            })?;

        let record = ExecutionRecord {
            job: execution.job,
            slot: completion.slot,
            exit_code: completion.exit_code,
            started_at: execution.started_at,
            duration: execution.started_at.elapsed(),
            output: self.capture_path(completion.slot),
        };

        debug!(
            job = %record.job,
            slot = record.slot,
            exit_code = ?record.exit_code,
            elapsed_ms = record.duration.as_millis() as u64,
            "execution finished"
        );

        Ok(Some(record))
    }
}

async fn run_action(job: &str, action: &Action, capture: &Path) -> Option<i32> {
    // `Stdio` and callables take a std handle.
    let file = match tokio::fs::File::create(capture).await {
        Ok(file) => file.into_std().await,
        Err(err) => {
            error!(
                job = %job,
                capture = %capture.display(),
                error = %err,
                "cannot create capture file; job not started"
            );
            return None;
        }
    };

    match action {
        Action::Command(cmdline) => run_command(job, cmdline, file).await,
        Action::Callable(f) => run_callable(job, f.clone(), file).await,
    }
}

async fn run_command(job: &str, cmdline: &str, mut file: File) -> Option<i32> {
    let mut child = match spawn_command(cmdline, &file) {
        Ok(child) => child,
        Err(err) => {
            warn!(job = %job, cmd = %cmdline, error = %err, "failed to spawn command");
            let line = spawn_error_line(cmdline, job, &err);
            if let Err(e) = file.write_all(line.as_bytes()) {
                error!(job = %job, error = %e, "cannot write spawn error to capture file");
            }
            return None;
        }
    };

    match child.wait().await {
        Ok(status) => {
            let code = exit_code_of(status);
            info!(
                job = %job,
                exit_code = code,
                success = status.success(),
                "job process exited"
            );
            Some(code)
        }
        Err(err) => {
            error!(job = %job, error = %err, "waiting for job process failed");
            None
        }
    }
}

fn spawn_command(cmdline: &str, capture: &File) -> std::io::Result<Child> {
    let mut cmd = build_command(cmdline)?;
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(capture.try_clone()?))
        .stderr(Stdio::from(capture.try_clone()?))
        .kill_on_drop(true);
    cmd.spawn()
}

async fn run_callable(job: &str, f: JobFn, mut file: File) -> Option<i32> {
    let result = tokio::task::spawn_blocking(move || {
        let code = f(&mut file);
        if let Err(e) = file.flush() {
            warn!(error = %e, "flushing capture file failed");
        }
        code
    })
    .await;

    match result {
        Ok(code) => {
            info!(job = %job, exit_code = code, "job callable returned");
            Some(code)
        }
        Err(err) => {
            warn!(job = %job, error = %err, "job callable panicked");
            None
        }
    }
}
