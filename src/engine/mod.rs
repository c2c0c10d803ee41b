// src/engine/mod.rs

//! Orchestration engine.
//!
//! [`Dispatch`] ties the job graph, the slot pool and the execution pool
//! together: it launches ready jobs into free slots, harvests completions,
//! propagates failures as skips and decides when the run is over.

pub mod dispatch;

pub use dispatch::Dispatch;
