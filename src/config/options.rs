// src/config/options.rs

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::config::model::OptionsSection;
use crate::errors::{JobdagError, Result};

/// Effective options for one run, after merging the command line with the
/// job file's `[options]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Slot capacity.
    pub max_jobs: usize,
    /// Directory holding one capture file per slot.
    pub output_directory: PathBuf,
    /// Print the graph as DOT instead of executing it.
    pub dot: bool,
}

impl RunOptions {
    /// Merge command-line values with the job file's options.
    ///
    /// - `max_jobs`: command line, then job file, then host parallelism.
    /// - `output_directory`: job file (relative to the job file), then
    ///   command line, then the current directory.
    pub fn resolve(
        cli_max_jobs: Option<usize>,
        cli_output_directory: Option<&Path>,
        dot: bool,
        section: &OptionsSection,
        jobfile: &Path,
    ) -> Result<Self> {
        let max_jobs = cli_max_jobs
            .or(section.max_jobs)
            .unwrap_or_else(default_max_jobs);

        if max_jobs == 0 {
            return Err(JobdagError::ConfigError(
                "max_jobs must be >= 1 (got 0)".to_string(),
            ));
        }

        let output_directory = match section.output_directory.as_deref() {
            Some(dir) => relative_to_file(Path::new(dir), jobfile),
            None => cli_output_directory
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        Ok(Self {
            max_jobs,
            output_directory,
            dot,
        })
    }
}

/// Slot capacity used when neither the command line nor the job file sets one.
pub fn default_max_jobs() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn relative_to_file(path: &Path, file: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(path),
        _ => path.to_path_buf(),
    }
}
