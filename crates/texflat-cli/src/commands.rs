use std::path::Path;

use anyhow::Result;
use texflat_core::IncludeGuard;
use tracing::info_span;

use texflat_cli::compiler::Latexmk;
use texflat_cli::config::TexflatConfig;
use texflat_cli::pipeline::{BuildReport, BuildRequest, BuildTargets, build, compile};

use crate::cli::{FlattenArgs, SectionArgs, TypesetArgs};

pub fn run_typeset(args: &TypesetArgs, config_path: Option<&Path>) -> Result<BuildReport> {
    let span = info_span!("typeset", section = %args.flatten.section.section.display());
    let _guard = span.enter();
    let targets = if args.with_init {
        BuildTargets::BOTH
    } else {
        BuildTargets::MAIN
    };
    let request = request_for(&args.flatten, targets, config_path)?;
    let mut report = build(&request)?;
    if !args.no_compile {
        let compiler = Latexmk::new(request.config.compiler.clone());
        compile(&mut report, &compiler)?;
    }
    Ok(report)
}

pub fn run_flatten(args: &FlattenArgs, config_path: Option<&Path>) -> Result<BuildReport> {
    let span = info_span!("flatten", section = %args.section.section.display());
    let _guard = span.enter();
    let request = request_for(args, BuildTargets::MAIN, config_path)?;
    build(&request)
}

pub fn run_init(args: &SectionArgs, config_path: Option<&Path>) -> Result<BuildReport> {
    let span = info_span!("init", section = %args.section.display());
    let _guard = span.enter();
    let request = BuildRequest {
        section: args.section.clone(),
        config: TexflatConfig::resolve(config_path, &args.section)?,
        targets: BuildTargets::INIT,
        include_guard: None,
    };
    build(&request)
}

fn request_for(
    args: &FlattenArgs,
    targets: BuildTargets,
    config_path: Option<&Path>,
) -> Result<BuildRequest> {
    let section = args.section.section.clone();
    let config = TexflatConfig::resolve(config_path, &section)?;
    Ok(BuildRequest {
        section,
        config,
        targets,
        include_guard: args.no_include_guard.then(IncludeGuard::unguarded),
    })
}
