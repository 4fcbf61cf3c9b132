//! Read-only context of one documentation run.
//!
//! [`Project`] bundles the snapshot with the tables built from it once:
//! the symbol table, the alias map and the effective external link table.
//! Everything downstream borrows it immutably; the only mutable state of a
//! run is the [`Diagnostics`] reporter passed alongside.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;
use tugdoc_core::config::Config;
use tugdoc_core::diagnostics::Diagnostics;
use tugdoc_core::error::TugdocResult;

use crate::alias::{build_alias_map, AliasMap};
use crate::ast::AstTree;
use crate::std_links::std_links;
use crate::symbols::{build_symbol_table, SymbolTable};

/// Tables and settings shared by every stage of a run.
#[derive(Debug)]
pub struct Project<'t> {
    pub tree: &'t AstTree,
    pub symbols: SymbolTable,
    pub aliases: AliasMap,
    /// External symbol path → URL (standard links underneath user links).
    pub external_links: BTreeMap<String, String>,
    /// Normalized navigation prefix, e.g. `/api` (may be empty).
    pub base_nav: String,
    pub max_depth: usize,
}

impl<'t> Project<'t> {
    /// Build the symbol table and alias map of `tree`.
    ///
    /// Fails only on the depth guard.
    pub fn build(
        tree: &'t AstTree,
        config: &Config,
        diagnostics: &mut Diagnostics,
    ) -> TugdocResult<Self> {
        let symbols = build_symbol_table(tree, config.max_depth)?;
        let aliases = build_alias_map(tree, config.max_depth, diagnostics)?;

        let mut external_links = if config.std_links {
            std_links()
        } else {
            BTreeMap::new()
        };
        external_links.extend(
            config
                .external_links
                .iter()
                .map(|(name, url)| (name.clone(), url.clone())),
        );

        info!(
            "Project {}: {} symbols, {} aliases",
            tree.root_name(),
            symbols.len(),
            aliases.len()
        );
        Ok(Project {
            tree,
            symbols,
            aliases,
            external_links,
            base_nav: config.normalized_base_nav(),
            max_depth: config.max_depth,
        })
    }

    /// Name of the project namespace.
    pub fn root_name(&self) -> &str {
        self.tree.root_name()
    }

    /// Serializable view of the tables, for inspection.
    pub fn tables(&self) -> ProjectTables<'_> {
        ProjectTables {
            root: self.root_name(),
            symbols: &self.symbols,
            aliases: &self.aliases,
        }
    }
}

/// Symbol table and alias map of a project.
#[derive(Debug, Serialize)]
pub struct ProjectTables<'a> {
    pub root: &'a str,
    pub symbols: &'a SymbolTable,
    pub aliases: &'a AliasMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{function, module, package, tree};

    fn sample() -> AstTree {
        tree(package(
            "pkg",
            "pkg/__init__.py",
            Some("Root."),
            vec![module("mod", "pkg/mod.py", None, vec![function("run", Some("Run."))])],
        ))
    }

    #[test]
    fn user_links_override_standard_links() {
        let tree = sample();
        let mut config = Config::default();
        config
            .external_links
            .insert("str".to_string(), "https://example.com/str".to_string());
        let project = Project::build(&tree, &config, &mut Diagnostics::new()).unwrap();
        assert_eq!(project.external_links["str"], "https://example.com/str");
        assert!(project.external_links.contains_key("typing.List"));
    }

    #[test]
    fn standard_links_can_be_disabled() {
        let tree = sample();
        let config = Config {
            std_links: false,
            ..Config::default()
        };
        let project = Project::build(&tree, &config, &mut Diagnostics::new()).unwrap();
        assert!(project.external_links.is_empty());
    }

    #[test]
    fn tables_serialize() {
        let tree = sample();
        let project = Project::build(&tree, &Config::default(), &mut Diagnostics::new()).unwrap();
        let json = serde_json::to_value(project.tables()).unwrap();
        assert_eq!(json["root"], "pkg");
        assert_eq!(json["symbols"]["mod.run"]["kind"], "function");
        assert_eq!(json["symbols"]["mod.run"]["navigation_path"], "mod.run");
    }
}
