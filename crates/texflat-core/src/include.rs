//! `\input{...}` directive handling and recursion guarding.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AssemblyError, Result};

/// Substring that marks a line as an inclusion line.
pub const INPUT_DIRECTIVE: &str = "\\input";

fn input_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\input\{([^}]*)\}").expect("input regex must compile"))
}

/// Returns true when the line is treated as an inclusion line.
#[must_use]
pub fn is_include(line: &str) -> bool {
    line.contains(INPUT_DIRECTIVE)
}

/// Extracts the path of the first `\input{...}` on the line.
///
/// Returns `None` when the line has no well-formed, non-empty payload.
#[must_use]
pub fn include_target(line: &str) -> Option<&str> {
    input_re()
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|target| target.as_str().trim())
        .filter(|target| !target.is_empty())
}

/// Builds the inclusion line for `file_name`, newline terminated.
#[must_use]
pub fn input_line(file_name: &str) -> String {
    format!("{INPUT_DIRECTIVE}{{{file_name}}}\n")
}

/// Limits applied while expanding nested inclusions.
///
/// Without a guard a unit that includes itself recurses until the stack is
/// exhausted. [`IncludeGuard::unguarded`] keeps that behavior available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeGuard {
    /// Maximum nesting depth; `None` means unbounded.
    pub max_depth: Option<usize>,
    /// Reject a unit that is already being expanded further up the chain.
    pub detect_cycles: bool,
}

impl Default for IncludeGuard {
    fn default() -> Self {
        Self::new(crate::conventions::DEFAULT_MAX_INCLUDE_DEPTH)
    }
}

impl IncludeGuard {
    /// Cycle detection plus a depth limit.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            detect_cycles: true,
        }
    }

    /// No cycle detection and no depth limit.
    #[must_use]
    pub const fn unguarded() -> Self {
        Self {
            max_depth: None,
            detect_cycles: false,
        }
    }

    /// Disable cycle detection, keeping the depth limit.
    #[must_use]
    pub const fn without_cycle_detection(mut self) -> Self {
        self.detect_cycles = false;
        self
    }

    /// Replace the depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// The chain of units currently being expanded, root first.
#[derive(Debug)]
pub(crate) struct IncludeChain<'g> {
    guard: &'g IncludeGuard,
    stack: Vec<PathBuf>,
}

impl<'g> IncludeChain<'g> {
    pub(crate) fn new(guard: &'g IncludeGuard, root: &Path) -> Self {
        Self {
            guard,
            stack: vec![normalize(root)],
        }
    }

    /// Number of inclusions between the root and the innermost unit.
    pub(crate) fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    pub(crate) fn enter(&mut self, path: &Path) -> Result<()> {
        let normalized = normalize(path);
        if self.guard.detect_cycles && self.stack.contains(&normalized) {
            let mut chain = self.stack.clone();
            chain.push(normalized);
            return Err(AssemblyError::IncludeCycle { chain });
        }
        if let Some(max_depth) = self.guard.max_depth
            && self.stack.len() > max_depth
        {
            return Err(AssemblyError::IncludeDepthExceeded {
                path: path.to_path_buf(),
                max_depth,
            });
        }
        self.stack.push(normalized);
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }
}

/// Folds `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
