//! In-memory TeX source units.
//!
//! A [`TexUnit`] is a file path plus two ordered line sequences: the
//! preamble and the document body. Lines are kept verbatim, line terminators
//! included, so concatenating them reproduces the source text minus comment
//! lines.
//!
//! Units are owned values. Loading and appending consume the unit and hand
//! it back, flattening builds a fresh unit, and copying always duplicates
//! the lines.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::iter;
use std::ops::Add;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};

use crate::error::{AssemblyError, Result};
use crate::include::{self, IncludeChain, IncludeGuard};

/// Line emitted between the preamble and the document body.
pub const BEGIN_DOCUMENT: &str = "\\begin{document}\n";
/// Line emitted after the document body.
pub const END_DOCUMENT: &str = "\\end{document}\n";

/// Which of the two line sequences an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Preamble,
    Document,
}

impl Part {
    /// Get a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Preamble => "preamble",
            Self::Document => "document",
        }
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A TeX source unit split into preamble and document lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexUnit {
    path: PathBuf,
    preamble: Vec<String>,
    document: Vec<String>,
}

impl TexUnit {
    /// Creates an empty unit bound to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            preamble: Vec::new(),
            document: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    pub fn document(&self) -> &[String] {
        &self.document
    }

    /// Lines of the given part.
    pub fn lines(&self, part: Part) -> &[String] {
        match part {
            Part::Preamble => &self.preamble,
            Part::Document => &self.document,
        }
    }

    fn lines_mut(&mut self, part: Part) -> &mut Vec<String> {
        match part {
            Part::Preamble => &mut self.preamble,
            Part::Document => &mut self.document,
        }
    }

    /// Returns true if the unit's path is an existing file.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    // === Loading ===

    /// Replaces the preamble with the file's non-comment lines.
    pub fn read_for_preamble(self) -> Result<Self> {
        self.read_for(Part::Preamble)
    }

    /// Replaces the document with the file's non-comment lines.
    pub fn read_for_document(self) -> Result<Self> {
        self.read_for(Part::Document)
    }

    /// Clears `part` and, if the file exists, fills it from disk.
    ///
    /// A missing file leaves `part` empty and is not an error.
    pub fn read_for(mut self, part: Part) -> Result<Self> {
        self.lines_mut(part).clear();
        if !self.exists() {
            debug!(path = %self.path.display(), %part, "source missing, treated as empty");
            return Ok(self);
        }
        let text = fs::read_to_string(&self.path).map_err(|source| AssemblyError::Read {
            path: self.path.clone(),
            source,
        })?;
        let lines = strip_comments(&text);
        trace!(path = %self.path.display(), %part, lines = lines.len(), "read source");
        *self.lines_mut(part) = lines;
        Ok(self)
    }

    // === Composition ===

    /// Appends `other`'s preamble lines, in order.
    #[must_use]
    pub fn extend_preamble(mut self, other: &TexUnit) -> Self {
        self.preamble.extend_from_slice(&other.preamble);
        self
    }

    /// Appends `other`'s document lines, in order.
    #[must_use]
    pub fn extend_document(mut self, other: &TexUnit) -> Self {
        self.document.extend_from_slice(&other.document);
        self
    }

    #[must_use]
    pub fn append_preamble(mut self, line: impl Into<String>) -> Self {
        self.preamble.push(line.into());
        self
    }

    #[must_use]
    pub fn append_document(mut self, line: impl Into<String>) -> Self {
        self.document.push(line.into());
        self
    }

    /// Copies both sequences into a new unit bound to `path`.
    #[must_use]
    pub fn copy_to(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            preamble: self.preamble.clone(),
            document: self.document.clone(),
        }
    }

    /// Moves the lines into a unit bound to `path`.
    #[must_use]
    pub fn relocate(self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self
        }
    }

    // === Flattening ===

    /// Expands every `\input` in the preamble using the default guard.
    pub fn build_preamble(&self) -> Result<Self> {
        self.build_with(Part::Preamble, &IncludeGuard::default())
    }

    /// Expands every `\input` in the document using the default guard.
    pub fn build_document(&self) -> Result<Self> {
        self.build_with(Part::Document, &IncludeGuard::default())
    }

    /// Returns a copy of this unit whose `part` contains no inclusion lines.
    ///
    /// Each inclusion line is replaced by the referenced unit's `part`,
    /// itself flattened, resolved relative to the including unit's directory.
    /// The other part is copied unchanged.
    pub fn build_with(&self, part: Part, guard: &IncludeGuard) -> Result<Self> {
        let mut chain = IncludeChain::new(guard, &self.path);
        self.flatten(part, &mut chain)
    }

    fn flatten(&self, part: Part, chain: &mut IncludeChain<'_>) -> Result<Self> {
        let mut lines = Vec::with_capacity(self.lines(part).len());
        for line in self.lines(part) {
            if !include::is_include(line) {
                lines.push(line.clone());
                continue;
            }
            let included = self.resolve_include(line)?;
            chain.enter(included.path())?;
            debug!(
                from = %self.path.display(),
                path = %included.path().display(),
                depth = chain.depth(),
                %part,
                "expanding include"
            );
            let included = included.read_for(part)?.flatten(part, chain)?;
            chain.leave();
            lines.extend(included.into_lines(part));
        }
        let mut built = self.clone();
        *built.lines_mut(part) = lines;
        Ok(built)
    }

    fn resolve_include(&self, line: &str) -> Result<Self> {
        let target =
            include::include_target(line).ok_or_else(|| AssemblyError::MalformedInclude {
                path: self.path.clone(),
                line: line.trim_end().to_string(),
            })?;
        let directory = self.path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::new(directory.join(target)))
    }

    fn into_lines(self, part: Part) -> Vec<String> {
        match part {
            Part::Preamble => self.preamble,
            Part::Document => self.document,
        }
    }

    // === Output ===

    fn output_lines(&self) -> impl Iterator<Item = &str> {
        self.preamble
            .iter()
            .map(String::as_str)
            .chain(iter::once(BEGIN_DOCUMENT))
            .chain(self.document.iter().map(String::as_str))
            .chain(iter::once(END_DOCUMENT))
    }

    /// The exact text [`TexUnit::write`] emits.
    pub fn render(&self) -> String {
        self.output_lines().collect()
    }

    /// Writes preamble, begin marker, document, end marker to the unit's path.
    ///
    /// Missing parent directories are created. An existing file is truncated.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty())
            && !parent.is_dir()
        {
            fs::create_dir_all(parent).map_err(|source| AssemblyError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let write_error = |source| AssemblyError::Write {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        for line in self.output_lines() {
            writer.write_all(line.as_bytes()).map_err(write_error)?;
        }
        writer.flush().map_err(write_error)?;
        info!(
            path = %self.path.display(),
            preamble_lines = self.preamble.len(),
            document_lines = self.document.len(),
            "wrote document"
        );
        Ok(())
    }
}

impl Add for TexUnit {
    type Output = TexUnit;

    /// Extends both sequences of `self` with those of `rhs`.
    fn add(mut self, rhs: TexUnit) -> TexUnit {
        self.preamble.extend(rhs.preamble);
        self.document.extend(rhs.document);
        self
    }
}

/// Returns true if the line's first non-whitespace character is `%`.
#[must_use]
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('%')
}

/// Splits text into newline-terminated lines, dropping comment lines.
#[must_use]
pub fn strip_comments(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .filter(|line| !is_comment(line))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_new_unit_is_empty() {
        let unit = TexUnit::new("a.tex");
        assert!(unit.preamble().is_empty());
        assert!(unit.document().is_empty());
        assert_eq!(unit.path(), Path::new("a.tex"));
    }

    #[test]
    fn test_strip_comments_keeps_terminators_and_blanks() {
        let lines = strip_comments("a\n% gone\n  %also gone\n\n   \nb 50% off\nlast");
        assert_eq!(lines, vec!["a\n", "\n", "   \n", "b 50% off\n", "last"]);
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let unit = TexUnit::new(dir.path().join("missing.tex"))
            .append_preamble("stale\n")
            .read_for_preamble()
            .unwrap();
        assert!(unit.preamble().is_empty());
    }

    #[test]
    fn test_read_replaces_only_target_part() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "a.tex", "x\ny\n");
        let unit = TexUnit::new(&path)
            .append_preamble("old\n")
            .append_document("keep\n")
            .read_for_preamble()
            .unwrap();
        assert_eq!(unit.preamble(), ["x\n", "y\n"]);
        assert_eq!(unit.document(), ["keep\n"]);

        let reread = unit.read_for_preamble().unwrap();
        assert_eq!(reread.preamble(), ["x\n", "y\n"]);
    }

    #[test]
    fn test_add_extends_both_parts() {
        let left = TexUnit::new("left.tex")
            .append_preamble("p1\n")
            .append_document("d1\n");
        let right = TexUnit::new("right.tex")
            .append_preamble("p2\n")
            .append_document("d2\n");
        let combined = left + right;
        assert_eq!(combined.path(), Path::new("left.tex"));
        assert_eq!(combined.preamble(), ["p1\n", "p2\n"]);
        assert_eq!(combined.document(), ["d1\n", "d2\n"]);
    }

    #[test]
    fn test_extend_appends_single_part() {
        let source = TexUnit::new("s.tex")
            .append_preamble("p\n")
            .append_document("d\n");
        let unit = TexUnit::new("t.tex").extend_document(&source);
        assert!(unit.preamble().is_empty());
        assert_eq!(unit.document(), ["d\n"]);
        let unit = unit.extend_preamble(&source);
        assert_eq!(unit.preamble(), ["p\n"]);
    }

    #[test]
    fn test_copy_does_not_alias() {
        let original = TexUnit::new("a.tex").append_document("one\n");
        let copy = original.copy_to("b.tex").append_document("two\n");
        assert_eq!(original.document(), ["one\n"]);
        assert_eq!(copy.document(), ["one\n", "two\n"]);
        assert_eq!(copy.path(), Path::new("b.tex"));
    }

    #[test]
    fn test_build_document_inlines_include() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "chapter.tex", "c1\n% note\nc2\n");
        let main = write_file(&dir, "main.tex", "before\n\\input{chapter.tex}\nafter\n");
        let built = TexUnit::new(&main)
            .read_for_document()
            .unwrap()
            .build_document()
            .unwrap();
        assert_eq!(built.document(), ["before\n", "c1\n", "c2\n", "after\n"]);
        assert_eq!(built.path(), main.as_path());
    }

    #[test]
    fn test_build_resolves_relative_to_including_unit() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "parts/intro.tex", "\\input{detail.tex}\n");
        write_file(&dir, "parts/detail.tex", "deep\n");
        write_file(&dir, "detail.tex", "wrong\n");
        let main = write_file(&dir, "main.tex", "\\input{parts/intro.tex}\n");
        let built = TexUnit::new(&main)
            .read_for_document()
            .unwrap()
            .build_document()
            .unwrap();
        assert_eq!(built.document(), ["deep\n"]);
    }

    #[test]
    fn test_build_preamble_uses_preamble_of_included_unit() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "packages.tex", "\\usepackage{amsmath}\n");
        let main = write_file(&dir, "pre.tex", "\\documentclass{article}\n\\input{packages.tex}\n");
        let built = TexUnit::new(&main)
            .read_for_preamble()
            .unwrap()
            .build_preamble()
            .unwrap();
        assert_eq!(
            built.preamble(),
            ["\\documentclass{article}\n", "\\usepackage{amsmath}\n"]
        );
        assert!(built.document().is_empty());
    }

    #[test]
    fn test_build_missing_include_expands_to_nothing() {
        let dir = TempDir::new().unwrap();
        let main = write_file(&dir, "main.tex", "a\n\\input{nowhere.tex}\nb\n");
        let built = TexUnit::new(&main)
            .read_for_document()
            .unwrap()
            .build_document()
            .unwrap();
        assert_eq!(built.document(), ["a\n", "b\n"]);
    }

    #[test]
    fn test_build_rejects_malformed_include() {
        let dir = TempDir::new().unwrap();
        let main = write_file(&dir, "main.tex", "\\input chapter\n");
        let err = TexUnit::new(&main)
            .read_for_document()
            .unwrap()
            .build_document()
            .unwrap_err();
        assert!(matches!(err, AssemblyError::MalformedInclude { ref line, .. } if line == "\\input chapter"));
    }

    #[test]
    fn test_render_places_markers() {
        let unit = TexUnit::new("x.tex")
            .append_preamble("\\documentclass{article}\n")
            .append_document("body\n");
        assert_eq!(
            unit.render(),
            "\\documentclass{article}\n\\begin{document}\nbody\n\\end{document}\n"
        );
    }

    #[test]
    fn test_write_creates_parent_dirs_and_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.tex");
        TexUnit::new(&path)
            .append_document("a much longer first body line\n")
            .write()
            .unwrap();
        let unit = TexUnit::new(&path).append_document("short\n");
        unit.write().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), unit.render());
    }

    proptest! {
        #[test]
        fn comment_stripping_is_idempotent(lines in prop::collection::vec("[ %a-z{}]{0,10}", 0..12)) {
            let text: String = lines.iter().map(|line| format!("{line}\n")).collect();
            let once = strip_comments(&text);
            let twice = strip_comments(&once.concat());
            prop_assert_eq!(&once, &twice);
            let expected = lines.iter().filter(|line| !line.trim_start().starts_with('%')).count();
            prop_assert_eq!(once.len(), expected);
        }

        #[test]
        fn flattening_without_includes_is_identity(lines in prop::collection::vec("[ %a-z{}]{0,10}\n", 0..12)) {
            let unit = lines
                .iter()
                .fold(TexUnit::new("flat.tex"), |unit, line| unit.append_document(line.clone()).append_preamble(line.clone()));
            let document = unit.build_document().unwrap();
            let preamble = unit.build_preamble().unwrap();
            prop_assert_eq!(&document, &unit);
            prop_assert_eq!(&preamble, &unit);
        }

        #[test]
        fn rendered_output_has_one_marker_pair(
            preamble in prop::collection::vec("[a-z ]{0,8}\n", 0..6),
            document in prop::collection::vec("[a-z ]{0,8}\n", 0..6),
        ) {
            let unit = preamble.iter().fold(TexUnit::new("x.tex"), |u, l| u.append_preamble(l.clone()));
            let unit = document.iter().fold(unit, |u, l| u.append_document(l.clone()));
            let rendered = unit.render();
            let lines: Vec<&str> = rendered.split_inclusive('\n').collect();
            let begin = lines.iter().position(|l| *l == BEGIN_DOCUMENT).unwrap();
            let end = lines.iter().position(|l| *l == END_DOCUMENT).unwrap();
            prop_assert_eq!(lines.iter().filter(|l| **l == BEGIN_DOCUMENT).count(), 1);
            prop_assert_eq!(lines.iter().filter(|l| **l == END_DOCUMENT).count(), 1);
            prop_assert_eq!(begin, preamble.len());
            prop_assert_eq!(end, begin + document.len() + 1);
            prop_assert_eq!(end, lines.len() - 1);
        }
    }
}
