//! Section path derivation.

use std::path::{Path, PathBuf};

use crate::conventions::Conventions;

/// A content subtree with its own entry point and content files.
///
/// All paths are derived from the section directory; no I/O happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    path: PathBuf,
    init: PathBuf,
    main: PathBuf,
    tex_path: PathBuf,
}

impl Section {
    /// Derives the section's file paths from its directory.
    pub fn new(path: impl Into<PathBuf>, conventions: &Conventions) -> Self {
        let path = path.into();
        let init = path.join(&conventions.init_file);
        let main = path.join(&conventions.main_file);
        let tex_path = sibling_tex_path(&path);
        Self {
            path,
            init,
            main,
            tex_path,
        }
    }

    /// The section directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<dir>/__init__.tex` by default.
    pub fn init(&self) -> &Path {
        &self.init
    }

    /// `<dir>/__main__.tex` by default.
    pub fn main(&self) -> &Path {
        &self.main
    }

    /// `<parent>/<stem>.tex`, beside the section directory.
    pub fn tex_path(&self) -> &Path {
        &self.tex_path
    }
}

fn sibling_tex_path(path: &Path) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(".tex");
    path.parent().unwrap_or_else(|| Path::new("")).join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_paths() {
        let section = Section::new("/p/src/chapter", &Conventions::default());
        assert_eq!(section.path(), Path::new("/p/src/chapter"));
        assert_eq!(section.init(), Path::new("/p/src/chapter/__init__.tex"));
        assert_eq!(section.main(), Path::new("/p/src/chapter/__main__.tex"));
        assert_eq!(section.tex_path(), Path::new("/p/src/chapter.tex"));
    }

    #[test]
    fn test_tex_path_uses_stem() {
        let section = Section::new("src/part.one", &Conventions::default());
        assert_eq!(section.tex_path(), Path::new("src/part.tex"));
    }

    #[test]
    fn test_custom_file_names() {
        let conventions = Conventions {
            init_file: "entry.tex".to_string(),
            main_file: "body.tex".to_string(),
            ..Conventions::default()
        };
        let section = Section::new("src/s", &conventions);
        assert_eq!(section.init(), Path::new("src/s/entry.tex"));
        assert_eq!(section.main(), Path::new("src/s/body.tex"));
    }
}
