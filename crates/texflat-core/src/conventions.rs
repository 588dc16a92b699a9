//! Naming and layout conventions for projects and sections.
//!
//! Every reserved file name and directory name the engine relies on lives
//! here, so tests and callers can swap them without touching the engine.

use serde::{Deserialize, Serialize};

/// Default section entry point file name.
pub const DEFAULT_INIT_FILE: &str = "__init__.tex";
/// Default section content file name.
pub const DEFAULT_MAIN_FILE: &str = "__main__.tex";
/// Default project-wide shared preamble file name.
pub const DEFAULT_PREAMBLE_FILE: &str = "__preamble__.tex";
/// Default source directory name under the project root.
pub const DEFAULT_SOURCE_DIR: &str = "src";
/// Default output directory name under the project root.
pub const DEFAULT_OUT_DIR: &str = "out";
/// Default substring that identifies the source directory during root discovery.
pub const DEFAULT_ROOT_MARKER: &str = "src";
/// Default limit on `\input` nesting.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

/// File and directory naming conventions for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Name of the per-section entry point file.
    pub init_file: String,
    /// Name of the per-section content file.
    pub main_file: String,
    /// Name of the shared preamble file at the project root.
    pub preamble_file: String,
    /// Source directory, relative to the project root.
    pub source_dir: String,
    /// Output directory, relative to the project root.
    pub out_dir: String,
    /// Substring an ancestor directory name must contain to be taken as the
    /// source directory when discovering the project root.
    pub root_marker: String,
    /// Maximum `\input` nesting depth.
    pub max_include_depth: usize,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            init_file: DEFAULT_INIT_FILE.to_string(),
            main_file: DEFAULT_MAIN_FILE.to_string(),
            preamble_file: DEFAULT_PREAMBLE_FILE.to_string(),
            source_dir: DEFAULT_SOURCE_DIR.to_string(),
            out_dir: DEFAULT_OUT_DIR.to_string(),
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl Conventions {
    /// Set the root marker used during project discovery.
    #[must_use]
    pub fn with_root_marker(mut self, marker: impl Into<String>) -> Self {
        self.root_marker = marker.into();
        self
    }

    /// Set the source and output directory names.
    #[must_use]
    pub fn with_dirs(mut self, source_dir: impl Into<String>, out_dir: impl Into<String>) -> Self {
        self.source_dir = source_dir.into();
        self.out_dir = out_dir.into();
        self
    }

    /// Set the maximum `\input` nesting depth.
    #[must_use]
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reserved_names() {
        let conventions = Conventions::default();
        assert_eq!(conventions.init_file, "__init__.tex");
        assert_eq!(conventions.main_file, "__main__.tex");
        assert_eq!(conventions.preamble_file, "__preamble__.tex");
        assert_eq!(conventions.source_dir, "src");
        assert_eq!(conventions.out_dir, "out");
        assert_eq!(conventions.root_marker, "src");
    }

    #[test]
    fn test_builders_override_fields() {
        let conventions = Conventions::default()
            .with_root_marker("content")
            .with_dirs("content", "build")
            .with_max_include_depth(3);
        assert_eq!(conventions.root_marker, "content");
        assert_eq!(conventions.source_dir, "content");
        assert_eq!(conventions.out_dir, "build");
        assert_eq!(conventions.max_include_depth, 3);
        assert_eq!(conventions.main_file, DEFAULT_MAIN_FILE);
    }
}
