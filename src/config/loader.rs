// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::location::SourceLocation;
use crate::config::model::{JobFile, RawJobFile};
use crate::dag::Graph;
use crate::errors::{JobdagError, Result};
use crate::exec::Action;

/// A parsed job file together with its source text, so spans can be turned
/// into line numbers.
#[derive(Debug, Clone)]
pub struct LoadedJobFile {
    pub path: PathBuf,
    pub contents: String,
    pub raw: RawJobFile,
}

impl LoadedJobFile {
    pub fn location(&self, offset: usize) -> SourceLocation {
        SourceLocation::from_offset(&self.path, &self.contents, offset)
    }

    /// Directory that relative paths in this file are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Read and parse a job file.
///
/// This only performs TOML deserialization; it does **not** build or
/// validate the graph. Use [`load_jobfile`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<LoadedJobFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let raw: RawJobFile = toml::from_str(&contents)?;

    Ok(LoadedJobFile {
        path: path.to_path_buf(),
        contents,
        raw,
    })
}

/// Build the graph defined by a job file, following its imports.
///
/// The graph is not validated; see [`load_jobfile`].
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    load_graph_with_chain(path.as_ref(), &mut Vec::new())
}

/// Load a job file, build its graph and validate it.
///
/// This is the recommended entry point for the binary.
pub fn load_jobfile(path: impl AsRef<Path>) -> Result<JobFile> {
    let loaded = load_from_path(&path)?;
    let canonical = fs::canonicalize(&loaded.path)?;
    let mut chain = vec![canonical];
    let graph = build_graph(&loaded, &mut chain)?;

    JobFile::try_from((loaded, graph))
}

/// `chain` holds the canonical paths of the files currently being imported,
/// outermost first.
pub(crate) fn load_graph_with_chain(path: &Path, chain: &mut Vec<PathBuf>) -> Result<Graph> {
    let canonical = fs::canonicalize(path)?;
    if chain.contains(&canonical) {
        return Err(JobdagError::ConfigError(format!(
            "import cycle: '{}' is already being imported",
            path.display()
        )));
    }

    chain.push(canonical);
    let loaded = load_from_path(path)?;
    let graph = build_graph(&loaded, chain);
    chain.pop();

    graph
}

/// Turn a parsed job file into a graph: imports first, then jobs in the order
/// they are defined.
fn build_graph(loaded: &LoadedJobFile, chain: &mut Vec<PathBuf>) -> Result<Graph> {
    let mut graph = Graph::new();
    let base_dir = loaded.base_dir();

    for entry in &loaded.raw.import {
        let location = loaded.location(entry.span().start);
        let import = entry.get_ref();
        let path = base_dir.join(&import.path);

        let merged = graph.import_with_chain(import.prefix_str(), &path, location, chain)?;
        debug!(
            file = %loaded.path.display(),
            import = %path.display(),
            prefix = import.prefix_str(),
            jobs = merged,
            "imported job file"
        );
    }

    for (name, job) in loaded.raw.jobs_in_definition_order() {
        let location = loaded.location(name.span().start);
        let name = name.get_ref();

        let Some(cmd) = job.cmd.as_ref() else {
            return Err(JobdagError::IncompleteJob {
                job: name.clone(),
                location,
            });
        };

        graph.add_job(name, job.after.iter(), Action::command(cmd), location)?;
    }

    Ok(graph)
}
