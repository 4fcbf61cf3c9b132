//! Core infrastructure for tugdoc.
//!
//! This crate provides language-agnostic infrastructure:
//! - Error types and error codes
//! - Run-scoped diagnostics reporter
//! - Symbol kinds and navigation paths
//! - Documentation output model and file emitter
//! - Configuration file handling

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod types;
