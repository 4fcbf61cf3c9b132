//! CLI front door helpers.
//!
//! Provides the operations behind the `tugdoc` subcommands:
//! - `generate` - write documentation files and print the run summary
//! - `symbols` - print the symbol table and alias map of a snapshot
//!
//! ## Error Handling
//!
//! All functions return `TugdocResult<T>`. Only fatal conditions are errors;
//! everything else ends up in the run summary.

use std::env;
use std::io::Write;
use std::path::Path;

use tracing::info;
use tugdoc_core::config::{CliOverrides, Config};
use tugdoc_core::diagnostics::Diagnostics;
use tugdoc_core::error::{TugdocError, TugdocResult};
use tugdoc_core::output::{emit_response, RunSummary};
use tugdoc_python::{generate_api, AstTree, Project};

/// How the end-of-run summary is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SummaryFormat {
    /// Labelled text sections.
    #[default]
    Text,
    /// One JSON object.
    Json,
}

/// Resolve the effective configuration.
///
/// Reads `config_path` when given, otherwise `tugdoc.toml` in the current
/// directory if present, then applies the command-line overrides.
pub fn load_config(config_path: Option<&Path>, overrides: CliOverrides) -> TugdocResult<Config> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = env::current_dir().map_err(|e| TugdocError::io(".", e))?;
            Config::load_from_project(&cwd)?
        }
    };
    Ok(config.with_overrides(overrides))
}

/// Generate documentation files for the snapshot and print the summary.
pub fn run_generate(
    snapshot: &Path,
    config: &Config,
    format: SummaryFormat,
    writer: &mut impl Write,
) -> TugdocResult<RunSummary> {
    let tree = AstTree::from_path(snapshot)?;
    info!("Loaded snapshot {} ({} nodes)", snapshot.display(), tree.len());

    let mut diagnostics = Diagnostics::new();
    let report = generate_api(&tree, config, &mut diagnostics)?;
    let summary = RunSummary::new(report.files_written.len(), &mut diagnostics);

    match format {
        SummaryFormat::Text => summary.render_text(writer),
        SummaryFormat::Json => emit_response(&summary, writer),
    }
    .map_err(|e| TugdocError::internal(format!("failed to print summary: {e}")))?;
    Ok(summary)
}

/// Print the symbol table and alias map of the snapshot as JSON.
pub fn run_symbols(snapshot: &Path, config: &Config, writer: &mut impl Write) -> TugdocResult<()> {
    let tree = AstTree::from_path(snapshot)?;
    let mut diagnostics = Diagnostics::new();
    let project = Project::build(&tree, config, &mut diagnostics)?;
    emit_response(&project.tables(), writer)
        .map_err(|e| TugdocError::internal(format!("failed to print tables: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
