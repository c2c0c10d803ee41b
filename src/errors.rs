// src/errors.rs

//! Crate-wide error type.
//!
//! Variants carry structured fields (job names, source locations,
//! predecessor lists). The message templates below are only rendered when an
//! error reaches the binary boundary.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::SourceLocation;
use crate::dag::JobState;

/// Coarse classification of a [`JobdagError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The job graph itself is malformed (bad reference, missing body, cycle).
    Definition,
    /// A directive was called with invalid arguments (e.g. `import`).
    Argument,
    /// Options, files or parsing.
    Configuration,
    /// Broken scheduler invariant; a bug, not a user error.
    Internal,
    /// The run was cancelled from outside (Ctrl-C).
    Interrupted,
}

#[derive(Error, Debug)]
pub enum JobdagError {
    #[error(
        "job '{job}' references undefined predecessor job(s) {} @ {location}",
        quoted_list(.missing)
    )]
    UndefinedPredecessor {
        job: String,
        missing: Vec<String>,
        location: SourceLocation,
    },

    #[error(
        "job '{job}' definition is incomplete @ {location}\n\n  Example:\n\n    [job.{job}]\n    cmd = \"...\"\n"
    )]
    IncompleteJob { job: String, location: SourceLocation },

    #[error("job '{job}' is already defined @ {location}")]
    DuplicateJob { job: String, location: SourceLocation },

    #[error("cycle detected in job graph involving job '{job}'")]
    DagCycle { job: String },

    #[error("import prefix argument must be a non-blank string @ {location}")]
    InvalidImportPrefix { location: SourceLocation },

    #[error("file '{}' not found @ {location}", .path.display())]
    ImportNotFound {
        path: PathBuf,
        location: SourceLocation,
    },

    #[error("file does not exist: {}", .0.display())]
    JobfileNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("slot {slot} released but it is not held")]
    SlotNotHeld { slot: usize },

    #[error("slot {slot} is already occupied by a running job")]
    SlotInUse { slot: usize },

    #[error(
        "deadlock: nothing is ready or running but {} job(s) are unfinished: {}",
        .unfinished.len(),
        quoted_list(.unfinished)
    )]
    Deadlock { unfinished: Vec<String> },

    #[error("job '{job}' cannot move from {from} to {to}")]
    InvalidTransition {
        job: String,
        from: JobState,
        to: JobState,
    },

    #[error("Job not found: {0}")]
    UnknownJob(String),

    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JobdagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JobdagError::UndefinedPredecessor { .. }
            | JobdagError::IncompleteJob { .. }
            | JobdagError::DuplicateJob { .. }
            | JobdagError::DagCycle { .. } => ErrorKind::Definition,
            JobdagError::InvalidImportPrefix { .. }
            | JobdagError::ImportNotFound { .. }
            | JobdagError::JobfileNotFound(_) => ErrorKind::Argument,
            JobdagError::ConfigError(_) | JobdagError::IoError(_) | JobdagError::TomlError(_) => {
                ErrorKind::Configuration
            }
            JobdagError::SlotNotHeld { .. }
            | JobdagError::SlotInUse { .. }
            | JobdagError::Deadlock { .. }
            | JobdagError::InvalidTransition { .. }
            | JobdagError::UnknownJob(_)
            | JobdagError::Other(_) => ErrorKind::Internal,
            JobdagError::Interrupted => ErrorKind::Interrupted,
        }
    }
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, JobdagError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("file", 3)
    }

    #[test]
    fn undefined_predecessor_lists_every_missing_name() {
        let err = JobdagError::UndefinedPredecessor {
            job: "job1".to_string(),
            missing: vec!["job0".to_string(), "setup".to_string()],
            location: loc(),
        };
        assert_eq!(
            err.to_string(),
            "job 'job1' references undefined predecessor job(s) 'job0', 'setup' @ file:3"
        );
        assert_eq!(err.kind(), ErrorKind::Definition);
    }

    #[test]
    fn incomplete_job_renders_an_example() {
        let err = JobdagError::IncompleteJob {
            job: "job0".to_string(),
            location: loc(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("job 'job0' definition is incomplete @ file:3"));
        assert!(msg.contains("[job.job0]"));
        assert!(msg.contains("cmd = \"...\""));
    }

    #[test]
    fn import_errors_are_argument_errors() {
        let prefix = JobdagError::InvalidImportPrefix { location: loc() };
        assert_eq!(
            prefix.to_string(),
            "import prefix argument must be a non-blank string @ file:3"
        );
        assert_eq!(prefix.kind(), ErrorKind::Argument);

        let missing = JobdagError::ImportNotFound {
            path: PathBuf::from("invalid.toml"),
            location: loc(),
        };
        assert_eq!(missing.to_string(), "file 'invalid.toml' not found @ file:3");
    }

    #[test]
    fn slot_errors_are_internal() {
        assert_eq!(JobdagError::SlotNotHeld { slot: 2 }.kind(), ErrorKind::Internal);
        assert_eq!(
            JobdagError::Deadlock {
                unfinished: vec!["a".to_string()]
            }
            .to_string(),
            "deadlock: nothing is ready or running but 1 job(s) are unfinished: 'a'"
        );
    }
}
