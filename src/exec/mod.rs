// src/exec/mod.rs

//! Execution layer.
//!
//! - [`action`] defines what a job runs: a command line or a callable.
//! - [`command`] turns command lines into `tokio::process::Command`s.
//! - [`slots`] is the fixed pool of numbered execution slots.
//! - [`pool`] tracks in-flight executions and hands back completions.

pub mod action;
pub mod command;
pub mod pool;
pub mod slots;

pub use action::{Action, JobFn};
pub use pool::{ExecutionRecord, Pool};
pub use slots::Slots;
