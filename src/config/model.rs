// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use toml::Spanned;

use crate::dag::Graph;

/// Job file as read from TOML, before any validation:
///
/// ```toml
/// [options]
/// max_jobs = 4
/// output_directory = "out"
///
/// [[import]]
/// prefix = "lib"
/// path = "common.toml"
///
/// [job.fetch]
/// cmd = "curl -O https://example.com/src.tar.gz"
///
/// [job.build]
/// cmd = "make"
/// after = ["fetch", "lib-setup"]
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawJobFile {
    #[serde(default)]
    pub options: OptionsSection,

    /// `[[import]]` entries, processed before any job of this file.
    #[serde(default)]
    pub import: Vec<Spanned<ImportEntry>>,

    /// All jobs from `[job.<name>]`.
    ///
    /// Keys are spanned so the loader can recover definition order and the
    /// line each job was defined on.
    #[serde(default)]
    pub job: BTreeMap<Spanned<String>, JobConfig>,
}

impl RawJobFile {
    /// Jobs in the order they appear in the file.
    pub fn jobs_in_definition_order(&self) -> Vec<(&Spanned<String>, &JobConfig)> {
        let mut jobs: Vec<_> = self.job.iter().collect();
        jobs.sort_by_key(|(name, _)| name.span().start);
        jobs
    }
}

/// `[options]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OptionsSection {
    /// Slot capacity; `--max-jobs` takes precedence.
    #[serde(default)]
    pub max_jobs: Option<usize>,

    /// Directory for per-slot capture files, relative to the job file.
    #[serde(default)]
    pub output_directory: Option<String>,
}

/// One `[[import]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportEntry {
    /// Kept untyped so a non-string prefix is reported as an import argument
    /// error instead of a TOML type error.
    #[serde(default)]
    pub prefix: Option<toml::Value>,

    pub path: String,
}

impl ImportEntry {
    /// Prefix text, or `""` if the prefix is missing or not a string.
    pub fn prefix_str(&self) -> &str {
        self.prefix
            .as_ref()
            .and_then(toml::Value::as_str)
            .unwrap_or_default()
    }
}

/// `[job.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JobConfig {
    /// The command line to execute. A job without one is incomplete.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Predecessors; each must be defined earlier in the file (or imported).
    #[serde(default)]
    pub after: Vec<String>,
}

/// A validated job file: the graph it defines plus its options.
#[derive(Debug)]
pub struct JobFile {
    pub path: PathBuf,
    pub options: OptionsSection,
    pub graph: Graph,
}
