// src/dag/graph.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use tracing::debug;

use crate::config::SourceLocation;
use crate::config::loader::load_graph_with_chain;
use crate::dag::job::{Job, JobState};
use crate::errors::{JobdagError, Result};
use crate::exec::Action;

/// Joins an import prefix and the imported job's name.
pub const IMPORT_SEPARATOR: &str = "-";

/// The job graph: every job record plus its predecessor edges.
///
/// Edge direction is predecessor -> dependent. Node indices follow definition
/// order, which is also the order ready jobs are handed out in.
///
/// The graph is the single source of truth for job state; the dispatcher
/// only changes it through [`Graph::mark_started`] and
/// [`Graph::mark_finished`].
#[derive(Debug, Clone, Default)]
pub struct Graph {
    dag: DiGraph<Job, ()>,
    index: HashMap<String, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a job.
    ///
    /// Every predecessor must already be defined; referencing a later or
    /// unknown job is a definition error, so a graph built only through this
    /// method cannot contain a cycle.
    pub fn add_job<I, S>(
        &mut self,
        name: &str,
        predecessors: I,
        action: Action,
        location: SourceLocation,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut preds: Vec<String> = Vec::new();
        for p in predecessors {
            let p = p.as_ref();
            if !preds.iter().any(|existing| existing == p) {
                preds.push(p.to_string());
            }
        }

        if self.index.contains_key(name) {
            return Err(JobdagError::DuplicateJob {
                job: name.to_string(),
                location,
            });
        }

        let missing: Vec<String> = preds
            .iter()
            .filter(|p| !self.index.contains_key(p.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(JobdagError::UndefinedPredecessor {
                job: name.to_string(),
                missing,
                location,
            });
        }

        let state = if preds
            .iter()
            .all(|p| self.dag[self.index[p]].state == JobState::Succeeded)
        {
            JobState::Ready
        } else {
            JobState::Pending
        };

        debug!(job = %name, predecessors = ?preds, %location, "job defined");

        let node = self
            .dag
            .add_node(Job::new(name.to_string(), preds, action, location, state));
        let pred_nodes: Vec<NodeIndex> = self.dag[node]
            .predecessors
            .iter()
            .map(|p| self.index[p])
            .collect();
        for pred in pred_nodes {
            self.dag.add_edge(pred, node, ());
        }
        self.index.insert(name.to_string(), node);

        Ok(())
    }

    /// Merge the jobs of another job file, renaming every job and predecessor
    /// to `prefix-name`.
    ///
    /// Returns the number of jobs merged.
    pub fn import(&mut self, prefix: &str, path: &Path, location: SourceLocation) -> Result<usize> {
        self.import_with_chain(prefix, path, location, &mut Vec::new())
    }

    pub(crate) fn import_with_chain(
        &mut self,
        prefix: &str,
        path: &Path,
        location: SourceLocation,
        chain: &mut Vec<PathBuf>,
    ) -> Result<usize> {
        if prefix.trim().is_empty() {
            return Err(JobdagError::InvalidImportPrefix { location });
        }
        if !path.is_file() {
            return Err(JobdagError::ImportNotFound {
                path: path.to_path_buf(),
                location,
            });
        }

        let imported = load_graph_with_chain(path, chain)?;
        self.merge_prefixed(prefix, imported, &location)
    }

    fn merge_prefixed(
        &mut self,
        prefix: &str,
        other: Graph,
        location: &SourceLocation,
    ) -> Result<usize> {
        let (nodes, _edges) = other.dag.into_nodes_edges();
        let count = nodes.len();

        for node in nodes {
            let job = node.weight;
            let name = prefixed(prefix, &job.name);
            if self.index.contains_key(&name) {
                return Err(JobdagError::DuplicateJob {
                    job: name,
                    location: location.clone(),
                });
            }

            let preds: Vec<String> = job
                .predecessors
                .iter()
                .map(|p| prefixed(prefix, p))
                .collect();
            self.add_job(&name, preds, job.action, job.location)?;
        }

        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.dag.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.dag.node_count() == 0
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.index.get(name).map(|&node| &self.dag[node])
    }

    pub fn state_of(&self, name: &str) -> Option<JobState> {
        self.job(name).map(Job::state)
    }

    /// All jobs, in definition order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.dag.node_weights()
    }

    /// Jobs currently `Ready`, in definition order.
    pub fn ready_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs().filter(|job| job.state == JobState::Ready)
    }

    /// Names of jobs not yet in a terminal state.
    pub fn unfinished(&self) -> Vec<String> {
        self.jobs()
            .filter(|job| !job.state.is_terminal())
            .map(|job| job.name.clone())
            .collect()
    }

    /// True once every job is `Succeeded`, `Failed` or `Skipped`.
    pub fn is_finished(&self) -> bool {
        self.jobs().all(|job| job.state.is_terminal())
    }

    /// Every job that depends on `name`, directly or transitively, in
    /// definition order.
    pub fn descendants(&self, name: &str) -> Result<Vec<String>> {
        let start = self.node(name)?;
        let mut found = Vec::new();
        let mut dfs = Dfs::new(&self.dag, start);
        while let Some(node) = dfs.next(&self.dag) {
            if node != start {
                found.push(node);
            }
        }
        Ok(self.names_in_order(found))
    }

    /// `Ready` -> `Running`, recording the slot the job was given.
    pub fn mark_started(&mut self, name: &str, slot: usize) -> Result<()> {
        let node = self.node(name)?;
        let job = &mut self.dag[node];
        if job.state != JobState::Ready {
            return Err(JobdagError::InvalidTransition {
                job: job.name.clone(),
                from: job.state,
                to: JobState::Running,
            });
        }

        job.state = JobState::Running;
        job.slot = Some(slot);
        Ok(())
    }

    /// `Running` -> `Succeeded` (exit code 0) or `Failed` (anything else,
    /// including a job that never started).
    ///
    /// On success, dependents whose predecessors have all succeeded become
    /// `Ready`. On failure, every transitive dependent becomes `Skipped`.
    /// Returns the names of the jobs skipped by this call, in definition
    /// order.
    pub fn mark_finished(&mut self, name: &str, exit_code: Option<i32>) -> Result<Vec<String>> {
        let node = self.node(name)?;
        let succeeded = exit_code == Some(0);
        let target = if succeeded {
            JobState::Succeeded
        } else {
            JobState::Failed
        };

        let job = &mut self.dag[node];
        if job.state != JobState::Running {
            return Err(JobdagError::InvalidTransition {
                job: job.name.clone(),
                from: job.state,
                to: target,
            });
        }
        job.state = target;
        job.exit_code = exit_code;

        if succeeded {
            self.promote_dependents(node);
            Ok(Vec::new())
        } else {
            Ok(self.skip_descendants(node))
        }
    }

    /// Check the graph can be ordered topologically.
    ///
    /// Pure; calling it again on a valid graph always succeeds.
    pub fn validate(&self) -> Result<()> {
        toposort(&self.dag, None)
            .map(|_| ())
            .map_err(|cycle| JobdagError::DagCycle {
                job: self.dag[cycle.node_id()].name.clone(),
            })
    }

    /// Graphviz rendering of jobs and predecessor edges.
    pub fn to_dot(&self) -> String {
        let names = self.dag.map(|_, job| job.name.clone(), |_, _| "");
        format!("{}", Dot::with_config(&names, &[Config::EdgeNoLabel]))
    }

    fn node(&self, name: &str) -> Result<NodeIndex> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| JobdagError::UnknownJob(name.to_string()))
    }

    fn promote_dependents(&mut self, node: NodeIndex) {
        let dependents: Vec<NodeIndex> = self
            .dag
            .neighbors_directed(node, Direction::Outgoing)
            .collect();

        for dep in dependents {
            if self.dag[dep].state != JobState::Pending {
                continue;
            }
            let ready = self
                .dag
                .neighbors_directed(dep, Direction::Incoming)
                .all(|pred| self.dag[pred].state == JobState::Succeeded);
            if ready {
                self.dag[dep].state = JobState::Ready;
                debug!(job = %self.dag[dep].name, "predecessors succeeded; job ready");
            }
        }
    }

    fn skip_descendants(&mut self, failed: NodeIndex) -> Vec<String> {
        let mut stack: Vec<NodeIndex> = self
            .dag
            .neighbors_directed(failed, Direction::Outgoing)
            .collect();
        let mut skipped = Vec::new();

        while let Some(node) = stack.pop() {
            if !matches!(self.dag[node].state, JobState::Pending | JobState::Ready) {
                continue;
            }
            self.dag[node].state = JobState::Skipped;
            debug!(
                job = %self.dag[node].name,
                failed = %self.dag[failed].name,
                "skipping job due to upstream failure"
            );
            skipped.push(node);
            stack.extend(self.dag.neighbors_directed(node, Direction::Outgoing));
        }

        self.names_in_order(skipped)
    }

    fn names_in_order(&self, mut nodes: Vec<NodeIndex>) -> Vec<String> {
        nodes.sort();
        nodes.dedup();
        nodes
            .into_iter()
            .map(|node| self.dag[node].name.clone())
            .collect()
    }
}

fn prefixed(prefix: &str, name: &str) -> String {
    format!("{prefix}{IMPORT_SEPARATOR}{name}")
}
