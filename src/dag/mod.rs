// src/dag/mod.rs

//! Job graph representation.
//!
//! - [`graph`] holds the petgraph-backed DAG of jobs, its validation and the
//!   state transitions the dispatcher drives.
//! - [`job`] defines the job record and its lifecycle states.

pub mod graph;
pub mod job;

pub use graph::{Graph, IMPORT_SEPARATOR};
pub use job::{Job, JobState};
