//! `texflat.toml` loading.
//!
//! ```toml
//! [conventions]
//! main_file = "body.tex"
//! root_marker = "src"
//!
//! [compiler]
//! program = "latexmk"
//! preview = false
//! ```
//!
//! Every field is optional and falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use texflat_core::Conventions;
use tracing::debug;

use crate::compiler::CompilerSettings;

/// File name searched for in the ancestors of a section directory.
pub const CONFIG_FILE_NAME: &str = "texflat.toml";

/// Combined project configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TexflatConfig {
    pub conventions: Conventions,
    pub compiler: CompilerSettings,
}

impl TexflatConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse texflat configuration")
    }

    /// Loads configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Loads `explicit` if given, else the nearest `texflat.toml` above
    /// `start`, else the defaults.
    pub fn resolve(explicit: Option<&Path>, start: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match find_config_file(start) {
            Some(path) => {
                debug!(path = %path.display(), "using discovered config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Finds the nearest `texflat.toml` in `start` or its ancestors.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
