//! Project-wide symbol table.
//!
//! [`build_symbol_table`] walks the documented module tree once and maps
//! every documented symbol to a [`SymbolRef`] (kind + navigation path).
//! Keys are canonical paths relative to the project root: the `root.`
//! prefix is stripped and the root module keeps its bare name.
//!
//! | Included | Kind |
//! |----------|------|
//! | every visited module, every plain file | module |
//! | documented class of a file | class |
//! | documented function / attribute of a file | function / attribute |
//! | documented own method / attribute of such a class | method / property |
//!
//! The walk descends into documented sub-packages and shares the depth
//! guard of the alias resolver: going deeper than `max_depth` aborts the run.

use std::collections::BTreeMap;

use tracing::debug;
use tugdoc_core::error::{TugdocError, TugdocResult};
use tugdoc_core::types::{SymbolKind, SymbolRef};

use crate::ast::{AstNode, AstTree};
use crate::elements::{class_attributes, class_methods, extract_module};

/// Relative canonical path → symbol reference.
pub type SymbolTable = BTreeMap<String, SymbolRef>;

// ============================================================================
// Root Prefix
// ============================================================================

/// Whether `path` lies inside the project namespace `root`.
pub fn is_internal(root: &str, path: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Strip the `root.` prefix of an internal path; other paths are returned
/// unchanged, and so is the root itself.
pub fn relative_path<'p>(root: &str, path: &'p str) -> &'p str {
    path.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(path)
}

/// Whether `path` ends with `suffix` on a segment boundary. An empty
/// suffix matches nothing.
pub fn ends_with_segments(path: &str, suffix: &str) -> bool {
    if suffix.is_empty() {
        return false;
    }
    path == suffix
        || path
            .strip_suffix(suffix)
            .is_some_and(|rest| rest.ends_with('.'))
}

// ============================================================================
// Builder
// ============================================================================

/// Build the symbol table of the tree.
pub fn build_symbol_table(tree: &AstTree, max_depth: usize) -> TugdocResult<SymbolTable> {
    let mut table = SymbolTable::new();
    collect_module(tree, tree.root(), 0, max_depth, &mut table)?;
    debug!("symbol table: {} entries", table.len());
    Ok(table)
}

fn collect_module(
    tree: &AstTree,
    module: &AstNode,
    depth: usize,
    max_depth: usize,
    table: &mut SymbolTable,
) -> TugdocResult<()> {
    if depth > max_depth {
        return Err(TugdocError::depth_exceeded(&module.path, max_depth));
    }

    let root = tree.root_name();
    let mut insert = |node: &AstNode, kind: SymbolKind| {
        let key = relative_path(root, &node.path).to_string();
        let symbol = SymbolRef::new(kind, &key);
        table.insert(key, symbol);
    };

    insert(module, SymbolKind::Module);

    let elements = extract_module(tree, module);
    for file in &elements.files {
        insert(file, SymbolKind::Module);
    }
    for function in &elements.functions {
        insert(function, SymbolKind::Function);
    }
    for attribute in &elements.attributes {
        insert(attribute, SymbolKind::Attribute);
    }
    for class in &elements.classes {
        insert(class, SymbolKind::Class);
        for method in class_methods(tree, class) {
            insert(method, SymbolKind::Method);
        }
        for property in class_attributes(tree, class) {
            insert(property, SymbolKind::Property);
        }
    }

    for child in &elements.modules {
        collect_module(tree, child, depth + 1, max_depth, table)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
