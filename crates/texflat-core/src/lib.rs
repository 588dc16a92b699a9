//! TeX document assembly.
//!
//! This crate merges a project-wide shared preamble with a section's content
//! tree and expands `\input{...}` directives into a single flat document.
//!
//! # Features
//!
//! - **Units**: Load preamble/body line sequences with `%` comment lines dropped
//! - **Flattening**: Recursively inline `\input` targets, guarded against cycles
//! - **Sections**: Derive init, main, and output names from a section directory
//! - **Projects**: Build the init artifact and the flattened main artifact
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use texflat_core::{Conventions, Project};
//!
//! let section_dir = Path::new("thesis/src/chapter1");
//! let project = Project::discover(section_dir, Conventions::default())?;
//! let section = project.section(section_dir);
//!
//! let main = project.build_main(&section)?;
//! assert_eq!(main.path(), Path::new("thesis/out/chapter1.tex"));
//! ```

mod conventions;
mod error;
mod include;
mod project;
mod section;
mod unit;

// === Error Types ===
pub use error::{AssemblyError, Result};

// === Configuration ===
pub use conventions::{
    Conventions, DEFAULT_INIT_FILE, DEFAULT_MAIN_FILE, DEFAULT_MAX_INCLUDE_DEPTH,
    DEFAULT_OUT_DIR, DEFAULT_PREAMBLE_FILE, DEFAULT_ROOT_MARKER, DEFAULT_SOURCE_DIR,
};

// === Units ===
pub use unit::{BEGIN_DOCUMENT, END_DOCUMENT, Part, TexUnit, is_comment, strip_comments};

// === Inclusion ===
pub use include::{INPUT_DIRECTIVE, IncludeGuard, include_target, input_line, is_include};

// === Layout ===
pub use project::{Project, discover_root};
pub use section::Section;
