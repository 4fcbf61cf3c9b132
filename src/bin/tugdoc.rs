//! Binary entry point for the tugdoc CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Generate documentation files from an ingestion snapshot
//! tugdoc generate --snapshot api.json --out assets/api
//!
//! # Same, with a JSON summary and an extra external link
//! tugdoc generate --snapshot api.json --summary json \
//!     --external numpy.ndarray=https://numpy.org/doc/stable/reference/generated/numpy.ndarray.html
//!
//! # Inspect the symbol table and alias map
//! tugdoc symbols --snapshot api.json
//! ```
//!
//! Logs go to stderr (`--log-format json` for one JSON object per line);
//! stdout carries the run summary or, on failure, a JSON
//! error response. The exit code reflects fatal errors only.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use tugdoc::cli::{load_config, run_generate, run_symbols, SummaryFormat};
use tugdoc::config::{parse_external_link, CliOverrides};
use tugdoc::error::TugdocError;
use tugdoc::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// API documentation extraction for Python packages.
#[derive(Parser, Debug)]
#[command(name = "tugdoc", version, about = "API documentation extraction for Python packages")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output (overridden by RUST_LOG).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Format of log lines on stderr.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

/// Format of log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one documentation file per documented module.
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Format of the end-of-run summary.
        #[arg(long, value_enum, default_value = "text")]
        summary: SummaryFormat,
    },
    /// Print the symbol table and alias map as JSON.
    Symbols {
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Snapshot and configuration arguments.
#[derive(Args, Debug)]
struct InputArgs {
    /// Ingestion snapshot (JSON).
    #[arg(long)]
    snapshot: PathBuf,

    /// Configuration file (default: tugdoc.toml in the current directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base navigation prefix, e.g. `/api`.
    #[arg(long)]
    nav: Option<String>,

    /// Output directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// External link in `NAME=URL` format. Can be repeated.
    #[arg(long, value_parser = parse_external_link)]
    external: Vec<(String, String)>,

    /// Do not include the Python standard library links.
    #[arg(long)]
    no_std_links: bool,

    /// Maximum module nesting depth.
    #[arg(long)]
    max_depth: Option<usize>,
}

impl InputArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            base_nav: self.nav.clone(),
            out: self.out.clone(),
            external_links: self.external.clone(),
            no_std_links: self.no_std_links,
            max_depth: self.max_depth,
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.log_level, cli.global.log_format);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let response = ErrorResponse::new(&err);
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();
            ExitCode::from(err.error_code().code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), TugdocError> {
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Generate { input, summary } => {
            let config = load_config(input.config.as_deref(), input.overrides())?;
            run_generate(&input.snapshot, &config, summary, &mut stdout)?;
        }
        Command::Symbols { input } => {
            let config = load_config(input.config.as_deref(), input.overrides())?;
            run_symbols(&input.snapshot, &config, &mut stdout)?;
        }
    }
    let _ = stdout.flush();
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
