//! Documentation output model and file emitter.
//!
//! This module defines the JSON schema consumed by the documentation
//! renderer. These types form the **renderer contract**: field names are
//! camelCase and every map is ordered, so the same input always produces
//! byte-identical files.
//!
//! ## Design Principles
//!
//! 1. **Deterministic:** same snapshot → same bytes (ordered maps, stable lists)
//! 2. **One file per module:** each documented module subtree is written to
//!    its own file, mirroring the module hierarchy on disk
//! 3. **Overwrite:** a stale file at the target path is removed first

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticCounts, Diagnostics};
use crate::error::{TugdocError, TugdocResult};

/// Extension of emitted documentation files.
pub const OUTPUT_EXTENSION: &str = "json";

// ============================================================================
// Semantic
// ============================================================================

/// Semantic tag of a node or section: role plus free-form metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semantic {
    pub role: String,
    pub labels: Vec<String>,
    pub attributes: BTreeMap<String, Option<String>>,
    pub relations: BTreeMap<String, Vec<String>>,
}

impl Semantic {
    /// Semantic with only a role.
    pub fn role(role: impl Into<String>) -> Self {
        Semantic {
            role: role.into(),
            ..Semantic::default()
        }
    }

    /// Add an attribute (a `None` value serializes as `null`).
    pub fn with_attribute(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Add a relation to other canonical paths.
    pub fn with_relation(mut self, key: impl Into<String>, targets: Vec<String>) -> Self {
        self.relations.insert(key.into(), targets);
        self
    }
}

/// Well-known semantic roles.
pub mod roles {
    pub const MODULE: &str = "module";
    pub const GLOBAL: &str = "global";
    pub const FUNCTION: &str = "function";
    pub const CLASS: &str = "class";
    pub const ATTRIBUTE: &str = "attribute";
    pub const METHOD: &str = "method";
    pub const TEXT: &str = "text";
    pub const ADMONITION: &str = "admonition";
    pub const ARGUMENTS: &str = "arguments";
    pub const RETURNS: &str = "returns";
}

// ============================================================================
// Documentation
// ============================================================================

/// Format of a section's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    #[default]
    Markdown,
}

/// One section of a symbol's documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationSection {
    pub title: Option<String>,
    /// Text with cross-references already rendered as links.
    pub content: String,
    pub content_type: ContentType,
    pub semantic: Semantic,
}

impl DocumentationSection {
    /// A markdown section.
    pub fn markdown(title: Option<String>, content: String, semantic: Semantic) -> Self {
        DocumentationSection {
            title,
            content,
            content_type: ContentType::Markdown,
            semantic,
        }
    }
}

/// Ordered documentation sections of a symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    pub sections: Vec<DocumentationSection>,
}

// ============================================================================
// Code
// ============================================================================

/// Source view of a class, function or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    /// File path relative to the root package directory, `/`-separated.
    pub file_path: String,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub declaration: String,
    /// Full source; absent for attributes.
    pub implementation: Option<String>,
    /// Referenced name → navigation link (`None` when unresolved).
    pub references: BTreeMap<String, Option<String>>,
}

// ============================================================================
// Nodes
// ============================================================================

/// A documented attribute (module global or class attribute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub semantic: Semantic,
    pub documentation: Documentation,
    pub path: String,
    pub code: Code,
}

/// A documented function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    pub name: String,
    pub documentation: Documentation,
    pub path: String,
    pub code: Code,
    pub semantic: Semantic,
}

/// A documented class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
    pub documentation: Documentation,
    pub path: String,
    pub semantic: Semantic,
    pub attributes: Vec<Attribute>,
    pub callables: Vec<Callable>,
    pub code: Code,
}

/// Reference from a module to one of its documented sub-packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildModule {
    pub name: String,
    /// Full canonical path of the child module.
    pub path: String,
    /// True when the child has no documented sub-package of its own.
    pub is_leaf: bool,
}

/// A plain module file documented inside its package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    /// File path relative to the root package directory, `/`-separated.
    pub path: String,
    pub documentation: Documentation,
}

/// The documentation node written for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub path: String,
    pub semantic: Semantic,
    pub children: Vec<ChildModule>,
    pub attributes: Vec<Attribute>,
    pub types: Vec<Type>,
    pub callables: Vec<Callable>,
    pub files: Vec<File>,
    pub documentation: Documentation,
}

// ============================================================================
// Run Summary
// ============================================================================

/// Machine-readable end-of-run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Always "ok": fatal errors never produce a summary.
    pub status: String,
    pub files_written: usize,
    pub counts: DiagnosticCounts,
    pub diagnostics: Diagnostics,
}

impl RunSummary {
    /// Build the summary, draining the run diagnostics.
    pub fn new(files_written: usize, diagnostics: &mut Diagnostics) -> Self {
        let diagnostics = diagnostics.drain();
        RunSummary {
            status: "ok".to_string(),
            files_written,
            counts: diagnostics.counts(),
            diagnostics,
        }
    }

    /// Render the labelled text summary.
    pub fn render_text(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer, "Files written: {}", self.files_written)?;
        self.diagnostics.render_text(writer)
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Error details for a failed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Exit code of the error (see [`crate::error::OutputErrorCode`]).
    pub code: u8,
    pub message: String,
    /// Path involved in the failure, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorInfo {
    /// Create from a TugdocError.
    pub fn from_error(err: &TugdocError) -> Self {
        let path = match err {
            TugdocError::DuplicatePath { path } | TugdocError::DepthExceeded { path, .. } => {
                Some(path.clone())
            }
            TugdocError::Io { path, .. } => Some(path.display().to_string()),
            _ => None,
        };
        ErrorInfo {
            code: err.error_code().code(),
            message: err.to_string(),
            path,
        }
    }
}

/// Response emitted instead of the run summary when a run fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "error".
    pub status: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn new(err: &TugdocError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Path of the file documenting the module at `canonical_path`.
///
/// Dots become path separators: `pkg.sub` → `<out>/pkg/sub.json`.
pub fn module_output_path(out: &Path, canonical_path: &str) -> PathBuf {
    let mut path = out.to_path_buf();
    for segment in canonical_path.split('.') {
        path.push(segment);
    }
    path.set_extension(OUTPUT_EXTENSION);
    path
}

/// Serialize a value as JSON with 4-space indentation.
pub fn to_json_pretty<T: Serialize>(value: &T) -> TugdocResult<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| TugdocError::internal(e.to_string()))
}

/// Write a value to `path`, replacing any stale file and creating parent
/// directories as needed.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> TugdocResult<()> {
    let json = to_json_pretty(value)?;
    if path.exists() {
        fs::remove_file(path).map_err(|e| TugdocError::io(path, e))?;
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TugdocError::io(parent, e))?;
    }
    fs::write(path, json).map_err(|e| TugdocError::io(path, e))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Emit a value as pretty JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
