//! Error types for document assembly.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading, flattening, or writing documents.
///
/// A missing source file is never an error: reads treat it as empty content.
#[derive(Debug, Error)]
pub enum AssemblyError {
    // === File System Errors ===
    /// Failed to read a source unit that exists on disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the parent directory of an output file.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Inclusion Errors ===
    /// A line mentions `\input` but carries no `{...}` payload.
    #[error("malformed \\input directive in {path}: {line}")]
    MalformedInclude { path: PathBuf, line: String },

    /// A unit includes itself, directly or through other units.
    #[error("include cycle detected: {}", display_chain(.chain))]
    IncludeCycle { chain: Vec<PathBuf> },

    /// Inclusions nest deeper than the configured limit.
    #[error("include depth limit of {max_depth} exceeded at {path}")]
    IncludeDepthExceeded { path: PathBuf, max_depth: usize },

    // === Project Layout Errors ===
    /// The path cannot be expressed relative to the project's source directory.
    #[error("{path} is not under source directory {source_dir}")]
    NotUnderSource { path: PathBuf, source_dir: PathBuf },

    /// No ancestor directory carries the project root marker.
    #[error("path is not under a project: no ancestor of {path} has '{marker}' in its name")]
    NoProjectRoot { path: PathBuf, marker: String },
}

fn display_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl AssemblyError {
    /// The file the error is attached to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Write { path, .. }
            | Self::MalformedInclude { path, .. }
            | Self::IncludeDepthExceeded { path, .. }
            | Self::NotUnderSource { path, .. }
            | Self::NoProjectRoot { path, .. } => Some(path),
            Self::IncludeCycle { chain } => chain.last().map(PathBuf::as_path),
        }
    }
}

/// Result type for assembly operations.
pub type Result<T> = std::result::Result<T, AssemblyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssemblyError::NotUnderSource {
            path: PathBuf::from("/p/other/s.tex"),
            source_dir: PathBuf::from("/p/src"),
        };
        assert_eq!(
            err.to_string(),
            "/p/other/s.tex is not under source directory /p/src"
        );
    }

    #[test]
    fn test_cycle_display_joins_chain() {
        let err = AssemblyError::IncludeCycle {
            chain: vec![
                PathBuf::from("a.tex"),
                PathBuf::from("b.tex"),
                PathBuf::from("a.tex"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "include cycle detected: a.tex -> b.tex -> a.tex"
        );
        assert_eq!(err.path(), Some(Path::new("a.tex")));
    }

    #[test]
    fn test_malformed_include_display() {
        let err = AssemblyError::MalformedInclude {
            path: PathBuf::from("main.tex"),
            line: "\\input chapter".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed \\input directive in main.tex: \\input chapter"
        );
    }
}
