// src/config/location.rs

use std::fmt;
use std::path::{Path, PathBuf};

/// Where a job or directive was defined, rendered as `file:line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: PathBuf,
    /// 1-based; `0` means the line is unknown.
    pub line: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Location for jobs added through the library API rather than a file.
    pub fn api() -> Self {
        Self::new("<api>", 0)
    }

    /// Location of byte `offset` inside `contents`, which was read from `file`.
    pub fn from_offset(file: &Path, contents: &str, offset: usize) -> Self {
        let end = offset.min(contents.len());
        let line = contents.as_bytes()[..end]
            .iter()
            .filter(|b| **b == b'\n')
            .count()
            + 1;
        Self::new(file, line)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}
