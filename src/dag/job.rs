// src/dag/job.rs

//! Job records and their lifecycle states.

use std::fmt;

use crate::config::SourceLocation;
use crate::exec::Action;

/// Lifecycle state of a job.
///
/// ```text
/// Pending -> Ready -> Running -> Succeeded
///    |         |          \---> Failed
///    \---------+--> Skipped (an ancestor failed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Waiting on at least one predecessor.
    Pending,
    /// Every predecessor succeeded; waiting for a slot.
    Ready,
    /// Dispatched into a slot.
    Running,
    Succeeded,
    /// Exited non-zero, or never started.
    Failed,
    /// Will never run because an ancestor failed.
    Skipped,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::Skipped
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Ready => "ready",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
            JobState::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// A named unit of work owned by a [`Graph`](crate::dag::Graph).
///
/// State, exit code and slot are read-only outside the `dag` module; the
/// graph's transition methods are the only way to change them.
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub predecessors: Vec<String>,
    pub action: Action,
    pub location: SourceLocation,
    pub(super) state: JobState,
    pub(super) exit_code: Option<i32>,
    pub(super) slot: Option<usize>,
}

impl Job {
    pub(super) fn new(
        name: String,
        predecessors: Vec<String>,
        action: Action,
        location: SourceLocation,
        state: JobState,
    ) -> Self {
        Self {
            name,
            predecessors,
            action,
            location,
            state,
            exit_code: None,
            slot: None,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// `None` until the job finishes, and also when it never started.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Slot the job ran in; kept after completion for reporting.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }
}
