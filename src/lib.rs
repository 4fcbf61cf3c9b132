//! tugdoc: API documentation extraction for Python packages.
//!
//! Turns an ingestion snapshot of a Python package into one JSON
//! documentation file per documented module, with docstring cross-references
//! and type references resolved to navigation links.

// Core infrastructure - re-exported from tugdoc-core
pub use tugdoc_core::config;
pub use tugdoc_core::diagnostics;
pub use tugdoc_core::error;
pub use tugdoc_core::output;
pub use tugdoc_core::types;

// Language engine
pub use tugdoc_python as python;

// Front door
pub mod cli;
