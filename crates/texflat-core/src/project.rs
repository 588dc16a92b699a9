//! Project layout and artifact assembly.
//!
//! A project root holds the shared preamble, a source tree of sections, and
//! an output tree that mirrors the source tree. Two artifacts can be built
//! for a section:
//!
//! - the **init** artifact: shared preamble plus a single `\input` of the
//!   section's main file, written inside the section directory and left
//!   unflattened for the compiler's own include mechanism;
//! - the **main** artifact: shared preamble plus the section's content with
//!   every `\input` expanded, written under the output tree.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::conventions::Conventions;
use crate::error::{AssemblyError, Result};
use crate::include::{IncludeGuard, input_line};
use crate::section::Section;
use crate::unit::{Part, TexUnit};

/// A project rooted at a directory.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    source: PathBuf,
    out: PathBuf,
    preamble: PathBuf,
    conventions: Conventions,
    include_guard: IncludeGuard,
}

impl Project {
    /// Creates a project at `root` using `conventions`.
    pub fn new(root: impl Into<PathBuf>, conventions: Conventions) -> Self {
        let root = root.into();
        let source = root.join(&conventions.source_dir);
        let out = root.join(&conventions.out_dir);
        let preamble = root.join(&conventions.preamble_file);
        let include_guard = IncludeGuard::new(conventions.max_include_depth);
        Self {
            root,
            source,
            out,
            preamble,
            conventions,
            include_guard,
        }
    }

    /// Creates the project that encloses `path`.
    pub fn discover(path: &Path, conventions: Conventions) -> Result<Self> {
        let root = discover_root(path, &conventions.root_marker)?;
        Ok(Self::new(root, conventions))
    }

    /// Sets the guard used when flattening section content.
    #[must_use]
    pub fn with_include_guard(mut self, guard: IncludeGuard) -> Self {
        self.include_guard = guard;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn out(&self) -> &Path {
        &self.out
    }

    /// The shared preamble file.
    pub fn preamble(&self) -> &Path {
        &self.preamble
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    pub fn include_guard(&self) -> &IncludeGuard {
        &self.include_guard
    }

    /// The section at `path`, named with this project's conventions.
    pub fn section(&self, path: impl Into<PathBuf>) -> Section {
        Section::new(path, &self.conventions)
    }

    /// Maps a path under the source tree onto the output tree.
    pub fn out_path(&self, path: &Path) -> Result<PathBuf> {
        let relative =
            path.strip_prefix(&self.source)
                .map_err(|_| AssemblyError::NotUnderSource {
                    path: path.to_path_buf(),
                    source_dir: self.source.clone(),
                })?;
        Ok(self.out.join(relative))
    }

    fn load_preamble(&self) -> Result<TexUnit> {
        TexUnit::new(&self.preamble).read_for_preamble()
    }

    /// Builds the init artifact in memory, bound to the section's init path.
    pub fn assemble_init(&self, section: &Section) -> Result<TexUnit> {
        let init = self
            .load_preamble()?
            .append_document(input_line(&self.conventions.main_file))
            .relocate(section.init());
        Ok(init)
    }

    /// Builds the flattened main artifact in memory, bound to its output path.
    pub fn assemble_main(&self, section: &Section) -> Result<TexUnit> {
        let out_path = self.out_path(section.tex_path())?;
        let preamble = self.load_preamble()?;
        let content = TexUnit::new(section.main())
            .read_for_document()?
            .build_with(Part::Document, &self.include_guard)?;
        debug!(
            section = %section.path().display(),
            preamble_lines = preamble.preamble().len(),
            document_lines = content.document().len(),
            "assembled section"
        );
        Ok((preamble + content).relocate(out_path))
    }

    /// Writes the init artifact. The returned unit's path is the output path.
    pub fn build_init(&self, section: &Section) -> Result<TexUnit> {
        let init = self.assemble_init(section)?;
        init.write()?;
        info!(section = %section.path().display(), path = %init.path().display(), "built init");
        Ok(init)
    }

    /// Writes the flattened main artifact. The returned unit's path is the output path.
    pub fn build_main(&self, section: &Section) -> Result<TexUnit> {
        let main = self.assemble_main(section)?;
        main.write()?;
        info!(section = %section.path().display(), path = %main.path().display(), "built main");
        Ok(main)
    }
}

/// Finds the project root enclosing `path`.
///
/// Walks the ancestors of `path` (excluding `path` itself) until a directory
/// whose name contains `marker` is found, and returns that directory's parent.
pub fn discover_root(path: &Path, marker: &str) -> Result<PathBuf> {
    path.ancestors()
        .skip(1)
        .find(|ancestor| {
            ancestor
                .file_name()
                .is_some_and(|name| name.to_string_lossy().contains(marker))
        })
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| AssemblyError::NoProjectRoot {
            path: path.to_path_buf(),
            marker: marker.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_paths() {
        let project = Project::new("/p", Conventions::default());
        assert_eq!(project.source(), Path::new("/p/src"));
        assert_eq!(project.out(), Path::new("/p/out"));
        assert_eq!(project.preamble(), Path::new("/p/__preamble__.tex"));
        assert_eq!(project.include_guard(), &IncludeGuard::new(64));
    }

    #[test]
    fn test_out_path_mirrors_source() {
        let project = Project::new("/p", Conventions::default());
        let out = project.out_path(Path::new("/p/src/a/b.tex")).unwrap();
        assert_eq!(out, PathBuf::from("/p/out/a/b.tex"));
    }

    #[test]
    fn test_out_path_outside_source() {
        let project = Project::new("/p", Conventions::default());
        let err = project.out_path(Path::new("/elsewhere/b.tex")).unwrap_err();
        assert!(matches!(err, AssemblyError::NotUnderSource { .. }));
    }

    #[test]
    fn test_discover_root() {
        assert_eq!(
            discover_root(Path::new("/p/src/chapter"), "src").unwrap(),
            PathBuf::from("/p")
        );
        assert_eq!(
            discover_root(Path::new("/p/src/part/chapter"), "src").unwrap(),
            PathBuf::from("/p")
        );
    }

    #[test]
    fn test_discover_root_matches_substring() {
        assert_eq!(
            discover_root(Path::new("/p/thesis-src/ch1"), "src").unwrap(),
            PathBuf::from("/p")
        );
    }

    #[test]
    fn test_discover_root_ignores_path_itself() {
        let err = discover_root(Path::new("/p/src"), "src").unwrap_err();
        assert!(matches!(err, AssemblyError::NoProjectRoot { .. }));
    }

    #[test]
    fn test_discover_root_relative() {
        let root = discover_root(Path::new("src/s"), "src").unwrap();
        let project = Project::new(root, Conventions::default());
        let section = project.section("src/s");
        assert_eq!(
            project.out_path(section.tex_path()).unwrap(),
            PathBuf::from("out/s.tex")
        );
    }

    #[test]
    fn test_discover_with_custom_marker() {
        let conventions = Conventions::default()
            .with_root_marker("content")
            .with_dirs("content", "build");
        let project = Project::discover(Path::new("/p/content/s"), conventions).unwrap();
        assert_eq!(project.root(), Path::new("/p"));
        assert_eq!(project.out(), Path::new("/p/build"));
    }
}
