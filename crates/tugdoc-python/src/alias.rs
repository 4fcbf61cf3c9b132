//! Re-export (alias) map of the project.
//!
//! Modules re-export names with `from x import name` (explicit) or
//! `from x import *` (wildcard). [`build_alias_map`] turns both forms into
//! `alias canonical path → target canonical path` entries, keeping only
//! targets that lie inside the project namespace.
//!
//! # Resolution rules
//!
//! | Form | Entry |
//! |------|-------|
//! | explicit, internal target | `module.name → target` |
//! | explicit, external target | none (handled by the external link table) |
//! | wildcard of an internal module | one entry per public member of that module |
//! | target unresolved by ingestion | none, error recorded against the alias |
//!
//! Targets may themselves be aliases; the map is not flattened here, the
//! cross-reference resolver follows chains with a bounded number of hops.
//!
//! The walk visits every non-alias module (packages and plain files) and
//! shares the depth guard of the symbol table builder.

use std::collections::BTreeMap;

use tracing::debug;
use tugdoc_core::diagnostics::Diagnostics;
use tugdoc_core::error::{TugdocError, TugdocResult};

use crate::ast::{AliasData, AstNode, AstTree, NodeKind};
use crate::symbols::is_internal;

/// Alias canonical path → target canonical path.
pub type AliasMap = BTreeMap<String, String>;

/// Description recorded for an alias whose target is unknown.
pub const UNRESOLVED_ALIAS: &str = "alias target could not be resolved";

/// Build the alias map of the tree.
///
/// Unresolvable aliases are recorded in `diagnostics`; only the depth guard
/// can fail.
pub fn build_alias_map(
    tree: &AstTree,
    max_depth: usize,
    diagnostics: &mut Diagnostics,
) -> TugdocResult<AliasMap> {
    let mut aliases = AliasMap::new();
    collect_module(tree, tree.root(), 0, max_depth, &mut aliases, diagnostics)?;
    debug!("alias map: {} entries", aliases.len());
    Ok(aliases)
}

fn collect_module(
    tree: &AstTree,
    module: &AstNode,
    depth: usize,
    max_depth: usize,
    aliases: &mut AliasMap,
    diagnostics: &mut Diagnostics,
) -> TugdocResult<()> {
    if depth > max_depth {
        return Err(TugdocError::depth_exceeded(&module.path, max_depth));
    }

    for child in tree.children(module) {
        if let NodeKind::Alias(data) = &child.kind {
            if data.wildcard {
                expand_wildcard(tree, module, child, data, aliases, diagnostics);
            } else {
                add_explicit(tree, module, child, data, aliases, diagnostics);
            }
        }
    }

    for child in tree.children(module).filter(|c| c.is_module()) {
        collect_module(tree, child, depth + 1, max_depth, aliases, diagnostics)?;
    }
    Ok(())
}

fn add_explicit(
    tree: &AstTree,
    module: &AstNode,
    alias: &AstNode,
    data: &AliasData,
    aliases: &mut AliasMap,
    diagnostics: &mut Diagnostics,
) {
    let root = tree.root_name();
    match &data.target {
        Some(target) if is_internal(root, target) => {
            aliases.insert(format!("{}.{}", module.path, alias.name), target.clone());
        }
        Some(target) => {
            debug!("alias {} re-exports external {}", alias.path, target);
        }
        None => {
            debug!("alias {} skipped: unresolved target", alias.path);
            diagnostics.add_error(&alias.path, UNRESOLVED_ALIAS);
        }
    }
}

fn expand_wildcard(
    tree: &AstTree,
    module: &AstNode,
    alias: &AstNode,
    data: &AliasData,
    aliases: &mut AliasMap,
    diagnostics: &mut Diagnostics,
) {
    let root = tree.root_name();
    let Some(target) = &data.target else {
        debug!("wildcard {} skipped: unresolved target", alias.path);
        diagnostics.add_error(&alias.path, UNRESOLVED_ALIAS);
        return;
    };
    if !is_internal(root, target) {
        debug!("wildcard {} imports external {}", alias.path, target);
        return;
    }
    let Some(source) = tree.get(target).filter(|node| node.is_module()) else {
        debug!("wildcard {} skipped: {} not found", alias.path, target);
        diagnostics.add_error(&alias.path, UNRESOLVED_ALIAS);
        return;
    };

    for member in tree.children(source) {
        if member.name.starts_with('_') || member.is_module() {
            continue;
        }
        let resolved = match &member.kind {
            NodeKind::Alias(member_alias) if member_alias.wildcard => None,
            NodeKind::Alias(member_alias) => member_alias
                .target
                .clone()
                .filter(|t| is_internal(root, t)),
            _ => Some(member.path.clone()),
        };
        if let Some(resolved) = resolved {
            aliases.insert(format!("{}.{}", module.path, member.name), resolved);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
