// src/exec/action.rs

use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// In-process job body. Receives the slot's capture sink and returns an
/// exit code.
pub type JobFn = Arc<dyn Fn(&mut dyn Write) -> i32 + Send + Sync>;

/// The work attached to a job.
#[derive(Clone)]
pub enum Action {
    /// External command line, run as a child process.
    Command(String),
    /// Callable run on Tokio's blocking pool.
    Callable(JobFn),
}

impl Action {
    pub fn command(cmd: impl Into<String>) -> Self {
        Action::Command(cmd.into())
    }

    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Write) -> i32 + Send + Sync + 'static,
    {
        Action::Callable(Arc::new(f))
    }

    /// Short human-readable form for logs.
    pub fn describe(&self) -> &str {
        match self {
            Action::Command(cmd) => cmd,
            Action::Callable(_) => "<callable>",
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Command(cmd) => f.debug_tuple("Command").field(cmd).finish(),
            Action::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}
