//! Build stages shared by the subcommands.
//!
//! 1. Resolve the project enclosing the section directory
//! 2. Assemble and write the requested artifacts
//! 3. Hand the main artifact to the compiler

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use texflat_core::{IncludeGuard, Project, Section, TexUnit};
use tracing::{info, info_span};

use crate::compiler::{CompileOutcome, Compiler};
use crate::config::TexflatConfig;

/// Which artifacts to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTargets {
    pub init: bool,
    pub main: bool,
}

impl BuildTargets {
    pub const MAIN: Self = Self {
        init: false,
        main: true,
    };
    pub const INIT: Self = Self {
        init: true,
        main: false,
    };
    pub const BOTH: Self = Self {
        init: true,
        main: true,
    };
}

/// Everything needed to build one section.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub section: PathBuf,
    pub config: TexflatConfig,
    pub targets: BuildTargets,
    /// Overrides the guard derived from the conventions.
    pub include_guard: Option<IncludeGuard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Init,
    Main,
}

impl ArtifactKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Main => "main",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub preamble_lines: usize,
    pub document_lines: usize,
}

impl ArtifactSummary {
    fn from_unit(kind: ArtifactKind, unit: &TexUnit) -> Self {
        Self {
            kind,
            path: unit.path().to_path_buf(),
            preamble_lines: unit.preamble().len(),
            document_lines: unit.document().len(),
        }
    }
}

#[derive(Debug)]
pub struct BuildReport {
    pub project_root: PathBuf,
    pub section: PathBuf,
    pub artifacts: Vec<ArtifactSummary>,
    pub compile: Option<CompileOutcome>,
}

impl BuildReport {
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactSummary> {
        self.artifacts.iter().find(|artifact| artifact.kind == kind)
    }

    /// True when the compiler ran and failed.
    pub fn has_errors(&self) -> bool {
        self.compile.as_ref().is_some_and(|outcome| !outcome.success)
    }
}

/// Resolves the project enclosing `section` and applies the request's guard.
pub fn resolve_project(request: &BuildRequest) -> Result<Project> {
    let project = Project::discover(&request.section, request.config.conventions.clone())
        .with_context(|| format!("locate project for {}", request.section.display()))?;
    Ok(match request.include_guard {
        Some(guard) => project.with_include_guard(guard),
        None => project,
    })
}

/// Writes the requested artifacts for one section.
pub fn build(request: &BuildRequest) -> Result<BuildReport> {
    let project = resolve_project(request)?;
    let section = project.section(&request.section);
    let span = info_span!(
        "build",
        root = %project.root().display(),
        section = %section.path().display()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let mut artifacts = Vec::new();
    if request.targets.init {
        artifacts.push(write_artifact(&project, &section, ArtifactKind::Init)?);
    }
    if request.targets.main {
        artifacts.push(write_artifact(&project, &section, ArtifactKind::Main)?);
    }
    info!(
        artifact_count = artifacts.len(),
        duration_ms = start.elapsed().as_millis(),
        "build complete"
    );

    Ok(BuildReport {
        project_root: project.root().to_path_buf(),
        section: section.path().to_path_buf(),
        artifacts,
        compile: None,
    })
}

fn write_artifact(
    project: &Project,
    section: &Section,
    kind: ArtifactKind,
) -> Result<ArtifactSummary> {
    let unit = match kind {
        ArtifactKind::Init => project.build_init(section),
        ArtifactKind::Main => project.build_main(section),
    }
    .with_context(|| format!("build {} artifact", kind.label()))?;
    Ok(ArtifactSummary::from_unit(kind, &unit))
}

/// Compiles the main artifact and records the outcome on the report.
pub fn compile(report: &mut BuildReport, compiler: &dyn Compiler) -> Result<()> {
    let path = main_path(report)?;
    let span = info_span!("compile", path = %path.display());
    let _guard = span.enter();
    let outcome = compiler.compile(&path)?;
    report.compile = Some(outcome);
    Ok(())
}

fn main_path(report: &BuildReport) -> Result<PathBuf> {
    report
        .artifact(ArtifactKind::Main)
        .map(|artifact| artifact.path.clone())
        .with_context(|| {
            format!(
                "no main artifact was built for {}",
                display_relative(&report.section, &report.project_root)
            )
        })
}

/// Shows `path` relative to `root` when possible.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
