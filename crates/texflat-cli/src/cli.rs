//! CLI argument definitions for texflat.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "texflat",
    version,
    about = "Flatten a LaTeX section into one document and typeset it",
    long_about = "Flatten a LaTeX section into one document and typeset it.\n\n\
                  The project's __preamble__.tex is combined with the section's\n\
                  __main__.tex, every \\input{...} is inlined, and the result is\n\
                  written under out/ before latexmk runs on it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: nearest texflat.toml above the section).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Flatten a section and run the compiler on the result.
    Typeset(TypesetArgs),

    /// Flatten a section without compiling it.
    Flatten(FlattenArgs),

    /// Write the section's __init__.tex entry point.
    Init(SectionArgs),
}

#[derive(Args)]
pub struct SectionArgs {
    /// Section directory under the project's source tree.
    #[arg(value_name = "SECTION")]
    pub section: PathBuf,
}

#[derive(Args)]
pub struct FlattenArgs {
    #[command(flatten)]
    pub section: SectionArgs,

    /// Expand \input without cycle detection or depth limit.
    #[arg(long = "no-include-guard")]
    pub no_include_guard: bool,
}

#[derive(Args)]
pub struct TypesetArgs {
    #[command(flatten)]
    pub flatten: FlattenArgs,

    /// Write the output file but skip the compiler.
    #[arg(long = "no-compile")]
    pub no_compile: bool,

    /// Also write the section's __init__.tex entry point.
    #[arg(long = "with-init")]
    pub with_init: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
