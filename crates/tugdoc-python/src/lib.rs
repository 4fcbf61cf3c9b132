//! Python API documentation engine for tugdoc.
//!
//! This crate turns an ingestion snapshot of a Python package into
//! documentation nodes. It includes:
//! - Snapshot loading into an index-addressed node arena
//! - Symbol table and re-export (alias) map construction
//! - Cross-reference resolution for docstring tags and type references
//! - Google-style docstring parsing
//! - Code snippet extraction
//! - Node transformation and per-module file emission

pub mod alias;
pub mod ast;
pub mod code;
pub mod docstring;
pub mod elements;
pub mod expr;
pub mod generate;
pub mod project;
pub mod std_links;
pub mod symbols;
pub mod transform;
pub mod xref;

#[doc(hidden)]
pub mod test_helpers;

pub use ast::AstTree;
pub use generate::{generate_api, GenerateReport};
pub use project::Project;
