#![allow(dead_code)]

use std::io::Write;
use std::time::Duration;

use jobdag::config::SourceLocation;
use jobdag::dag::Graph;
use jobdag::exec::Action;

/// Builder for `Graph` to simplify test setup.
///
/// Jobs are added in call order, which is also their definition order.
/// Panics on definition errors; use `Graph::add_job` directly to test those.
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Add a job with an explicit action.
    pub fn job(mut self, name: &str, after: &[&str], action: Action) -> Self {
        self.graph
            .add_job(name, after.iter().copied(), action, SourceLocation::api())
            .unwrap_or_else(|e| panic!("failed to add job '{name}': {e}"));
        self
    }

    /// Add a job running an external command line.
    pub fn command(self, name: &str, after: &[&str], cmd: &str) -> Self {
        self.job(name, after, Action::command(cmd))
    }

    /// Add a callable job that writes its name to the capture file and
    /// returns `code`.
    pub fn exit_with(self, name: &str, after: &[&str], code: i32) -> Self {
        let label = name.to_string();
        self.job(
            name,
            after,
            Action::callable(move |out: &mut dyn Write| {
                let _ = writeln!(out, "{label}");
                code
            }),
        )
    }

    /// Like `exit_with`, but sleeps for `delay` first.
    pub fn slow(self, name: &str, after: &[&str], delay: Duration, code: i32) -> Self {
        self.job(
            name,
            after,
            Action::callable(move |_out: &mut dyn Write| {
                std::thread::sleep(delay);
                code
            }),
        )
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
