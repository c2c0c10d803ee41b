// src/config/mod.rs

//! Job file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a job file from disk and build a [`Graph`](crate::dag::Graph)
//!   from it, following `[[import]]` entries (`loader.rs`).
//! - Validate the result before anything is dispatched (`validate.rs`).
//! - Merge job-file options with command-line options (`options.rs`).

pub mod loader;
pub mod location;
pub mod model;
pub mod options;
pub mod validate;

pub use loader::{load_from_path, load_graph, load_jobfile, LoadedJobFile};
pub use location::SourceLocation;
pub use model::{ImportEntry, JobConfig, JobFile, OptionsSection, RawJobFile};
pub use options::RunOptions;
