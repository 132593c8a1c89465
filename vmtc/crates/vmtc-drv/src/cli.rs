//! Command line interface.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{BootstrapMode, Config};
use crate::error::{Result, TranslateError};
use crate::session::{Session, TranslationReport};

/// vmtc - translate Hack VM code into Hack assembly
///
/// Give a single `.vm` file to get `<name>.asm` beside it, or a directory to
/// translate every `.vm` file in it into `<dir>/<dir-name>.asm` with the
/// bootstrap code in front.
#[derive(Parser, Debug)]
#[command(name = "vmtc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Translate Hack VM code into Hack assembly", long_about = None)]
pub struct Cli {
    /// A .vm file or a directory of .vm files
    #[arg(value_name = "INPUT", num_args = 0..)]
    pub inputs: Vec<PathBuf>,

    /// Write the assembly here instead of the default location
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, env = "VMTC_VERBOSE")]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(short, long, env = "VMTC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, env = "VMTC_NO_COLOR")]
    pub no_color: bool,

    /// When to emit the bootstrap (default: for directories)
    #[arg(long, value_enum)]
    pub bootstrap: Option<BootstrapMode>,

    /// Do not annotate the output with the VM commands
    #[arg(long)]
    pub no_comments: bool,

    /// Print the function table (function=unit) after translating
    #[arg(long)]
    pub dump_functions: bool,
}

impl Cli {
    /// The input path, if exactly one was given.
    pub fn input(&self) -> Option<&Path> {
        match self.inputs.as_slice() {
            [input] => Some(input),
            _ => None,
        }
    }

    /// Flags win over the configuration file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.verbose {
            config.verbose = true;
        }
        if let Some(mode) = self.bootstrap {
            config.translate.bootstrap = mode;
        }
        if self.no_comments {
            config.translate.emit_comments = false;
        }
    }
}

/// The usage line, for argument count errors.
pub fn usage() -> String {
    Cli::command().render_usage().to_string()
}

/// Initialize the logging system. Logs go to stderr.
pub fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| TranslateError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Translate `input` with a fully resolved configuration.
pub fn run(cli: &Cli, input: &Path, config: Config) -> anyhow::Result<TranslationReport> {
    let mut session = Session::open(input, config)
        .with_context(|| format!("failed to read input {}", input.display()))?;
    if let Some(output) = &cli.output {
        session = session.with_output(output);
    }

    let report = session.translate()?;
    info!(
        units = report.units,
        functions = report.functions.len(),
        bootstrap = report.bootstrap,
        "translated {} into {}",
        input.display(),
        report.output.display()
    );

    if cli.dump_functions {
        print!("{}", report.functions.dump());
    }
    Ok(report)
}
