// src/config/validate.rs

use crate::config::loader::LoadedJobFile;
use crate::config::model::{JobFile, OptionsSection};
use crate::dag::Graph;
use crate::errors::{JobdagError, Result};

impl TryFrom<(LoadedJobFile, Graph)> for JobFile {
    type Error = JobdagError;

    fn try_from((loaded, graph): (LoadedJobFile, Graph)) -> std::result::Result<Self, Self::Error> {
        validate_options(&loaded.raw.options)?;
        graph.validate()?;

        Ok(JobFile {
            path: loaded.path,
            options: loaded.raw.options,
            graph,
        })
    }
}

fn validate_options(options: &OptionsSection) -> Result<()> {
    if options.max_jobs == Some(0) {
        return Err(JobdagError::ConfigError(
            "[options].max_jobs must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Some(dir) = options.output_directory.as_deref() {
        if dir.trim().is_empty() {
            return Err(JobdagError::ConfigError(
                "[options].output_directory must not be blank".to_string(),
            ));
        }
    }

    Ok(())
}
