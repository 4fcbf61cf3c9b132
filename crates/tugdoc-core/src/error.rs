//! Error types and error code constants for tugdoc.
//!
//! This module provides the unified fatal error type (`TugdocError`) for a
//! documentation run. Only conditions that must abort the run live here:
//! malformed ingestion input, the recursion-depth guard, configuration
//! problems, and I/O failures while emitting output.
//!
//! Everything that can degrade gracefully (unresolved cross-references,
//! malformed docstring sections, unresolvable aliases) is recorded in
//! [`crate::diagnostics::Diagnostics`] instead and never becomes a
//! `TugdocError`.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments or configuration
//! - `3`: Input errors (malformed snapshot, recursion depth exceeded)
//! - `4`: Output errors (failed to write documentation files)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable process exit codes for fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments or configuration from the caller.
    InvalidArguments = 2,
    /// Malformed or cyclic ingestion input.
    InputError = 3,
    /// Failed to write documentation output.
    OutputError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Fatal error for a documentation run.
#[derive(Debug, Error)]
pub enum TugdocError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Configuration file could not be read or parsed.
    #[error("config error: {message}")]
    Config { message: String },

    /// The ingestion snapshot is malformed.
    #[error("invalid snapshot: {message}")]
    Snapshot { message: String },

    /// Two nodes of the snapshot share a canonical path.
    #[error("duplicate canonical path in snapshot: {path}")]
    DuplicatePath { path: String },

    /// Traversal went deeper than the configured maximum.
    ///
    /// Signals a cyclic or malformed module tree.
    #[error("maximum recursion depth ({max_depth}) exceeded at {path}")]
    DepthExceeded { path: String, max_depth: usize },

    /// I/O failure on a specific path.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

/// Result alias for fatal tugdoc operations.
pub type TugdocResult<T> = Result<T, TugdocError>;

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&TugdocError> for OutputErrorCode {
    fn from(err: &TugdocError) -> Self {
        match err {
            TugdocError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            TugdocError::Config { .. } => OutputErrorCode::InvalidArguments,
            TugdocError::Snapshot { .. } => OutputErrorCode::InputError,
            TugdocError::DuplicatePath { .. } => OutputErrorCode::InputError,
            TugdocError::DepthExceeded { .. } => OutputErrorCode::InputError,
            TugdocError::Io { .. } => OutputErrorCode::OutputError,
            TugdocError::Json(_) => OutputErrorCode::InputError,
            TugdocError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<TugdocError> for OutputErrorCode {
    fn from(err: TugdocError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl TugdocError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        TugdocError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a snapshot error.
    pub fn snapshot(message: impl Into<String>) -> Self {
        TugdocError::Snapshot {
            message: message.into(),
        }
    }

    /// Create a depth-exceeded error for the node at `path`.
    pub fn depth_exceeded(path: impl Into<String>, max_depth: usize) -> Self {
        TugdocError::DepthExceeded {
            path: path.into(),
            max_depth,
        }
    }

    /// Create an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TugdocError::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        TugdocError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
