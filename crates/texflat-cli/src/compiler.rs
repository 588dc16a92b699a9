//! External typesetting step.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default compiler executable.
pub const DEFAULT_PROGRAM: &str = "latexmk";
/// Default latexmk rc file, relative to the working directory.
pub const DEFAULT_RC_FILE: &str = "../etc/latexmk/.latexmkrc";

/// How the compiler is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Executable name or path.
    pub program: String,
    /// rc file passed with `-r`; an empty path disables the flag.
    pub rc_file: PathBuf,
    /// Open the previewer after a successful build (`-pv`).
    pub preview: bool,
    /// Extra arguments placed before the input file.
    pub extra_args: Vec<String>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            rc_file: PathBuf::from(DEFAULT_RC_FILE),
            preview: true,
            extra_args: Vec::new(),
        }
    }
}

/// Result of one compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    pub success: bool,
    /// Exit code, absent when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard error.
    pub stderr: String,
}

/// Turns a written document into typeset output.
pub trait Compiler {
    fn compile(&self, path: &Path) -> Result<CompileOutcome>;
}

/// Runs `latexmk` (or a compatible program) on the document.
#[derive(Debug, Clone)]
pub struct Latexmk {
    settings: CompilerSettings,
}

impl Latexmk {
    pub fn new(settings: CompilerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Command-line arguments for compiling `path`.
    pub fn arguments(&self, path: &Path) -> Vec<OsString> {
        let mut args = Vec::new();
        if self.settings.preview {
            args.push(OsString::from("-pv"));
        }
        if !self.settings.rc_file.as_os_str().is_empty() {
            args.push(OsString::from("-r"));
            args.push(self.settings.rc_file.clone().into_os_string());
        }
        let out_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut out_dir_arg = OsString::from("-output-directory=");
        out_dir_arg.push(out_dir);
        args.push(out_dir_arg);
        args.extend(self.settings.extra_args.iter().map(OsString::from));
        args.push(path.as_os_str().to_os_string());
        args
    }
}

impl Compiler for Latexmk {
    fn compile(&self, path: &Path) -> Result<CompileOutcome> {
        let args = self.arguments(path);
        info!(program = %self.settings.program, path = %path.display(), "running compiler");
        let output = Command::new(&self.settings.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to run {}", self.settings.program))?;
        let outcome = CompileOutcome {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !outcome.success {
            warn!(
                program = %self.settings.program,
                code = ?outcome.code,
                "compiler reported failure"
            );
        }
        Ok(outcome)
    }
}
