//! Documentation run orchestration.
//!
//! [`generate_api`] builds the [`Project`] tables once, then walks the
//! documented packages depth-first from the root, writing one JSON file per
//! module under the configured output directory.
//!
//! Fatal conditions (depth guard, I/O) abort the run. Because the tables are
//! built before anything is written, a tree that exceeds the depth guard
//! produces no output at all.

use std::path::PathBuf;

use tracing::{debug, info};
use tugdoc_core::config::Config;
use tugdoc_core::diagnostics::Diagnostics;
use tugdoc_core::error::{TugdocError, TugdocResult};
use tugdoc_core::output::{module_output_path, write_json_file};

use crate::ast::{AstNode, AstTree};
use crate::project::Project;
use crate::transform::transform_module;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Written files, in traversal order.
    pub files_written: Vec<PathBuf>,
}

/// Generate the documentation files of `tree` into `config.out`.
///
/// Degraded issues are recorded in `diagnostics`; only fatal conditions
/// return an error.
pub fn generate_api(
    tree: &AstTree,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> TugdocResult<GenerateReport> {
    let project = Project::build(tree, config, diagnostics)?;
    let mut report = GenerateReport::default();
    let mut generator = Generator {
        project: &project,
        config,
        report: &mut report,
    };
    generator.generate(tree.root(), 0, diagnostics)?;
    info!(
        "Generated {} files into {}",
        report.files_written.len(),
        config.out.display()
    );
    Ok(report)
}

struct Generator<'a, 't> {
    project: &'a Project<'t>,
    config: &'a Config,
    report: &'a mut GenerateReport,
}

impl Generator<'_, '_> {
    fn generate(
        &mut self,
        node: &AstNode,
        depth: usize,
        diagnostics: &mut Diagnostics,
    ) -> TugdocResult<()> {
        if depth > self.project.max_depth {
            return Err(TugdocError::depth_exceeded(&node.path, self.project.max_depth));
        }

        let mut partial = Diagnostics::new();
        let module = transform_module(self.project, node, &mut partial);
        debug!("{}: {:?}", node.path, partial.counts());
        diagnostics.merge(partial);

        let target = module_output_path(&self.config.out, &node.path);
        write_json_file(&target, &module)?;
        self.report.files_written.push(target);

        for child in &module.children {
            let child_node = self.project.tree.get(&child.path).ok_or_else(|| {
                TugdocError::internal(format!("child module {} not in snapshot", child.path))
            })?;
            self.generate(child_node, depth + 1, diagnostics)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{function, module, nested_packages, package, tree};
    use std::fs;
    use tempfile::TempDir;

    fn config(out: &TempDir) -> Config {
        Config {
            out: out.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn writes_one_file_per_documented_package() {
        let tree = tree(package(
            "pkg",
            "pkg/__init__.py",
            Some("Root."),
            vec![
                module("mod", "pkg/mod.py", None, vec![function("run", Some("Run."))]),
                package(
                    "sub",
                    "pkg/sub/__init__.py",
                    Some("Sub."),
                    vec![package("deep", "pkg/sub/deep/__init__.py", Some("Deep."), vec![])],
                ),
                package("bare", "pkg/bare/__init__.py", None, vec![]),
            ],
        ));
        let out = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new();
        let report = generate_api(&tree, &config(&out), &mut diagnostics).unwrap();

        let expected = [
            out.path().join("pkg.json"),
            out.path().join("pkg/sub.json"),
            out.path().join("pkg/sub/deep.json"),
        ];
        assert_eq!(report.files_written, expected);
        assert!(expected.iter().all(|p| p.is_file()));
        assert!(!out.path().join("pkg/bare.json").exists());
    }

    #[test]
    fn stale_file_is_replaced() {
        let tree = tree(package("pkg", "pkg/__init__.py", Some("Root."), vec![]));
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("pkg.json"), "stale").unwrap();

        generate_api(&tree, &config(&out), &mut Diagnostics::new()).unwrap();
        let content = fs::read_to_string(out.path().join("pkg.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["name"], "pkg");
    }

    #[test]
    fn depth_exceeded_writes_nothing() {
        let tree = tree(nested_packages("pkg", 4));
        let out = TempDir::new().unwrap();
        let config = Config {
            max_depth: 2,
            ..config(&out)
        };
        let err = generate_api(&tree, &config, &mut Diagnostics::new()).unwrap_err();

        assert!(matches!(err, TugdocError::DepthExceeded { max_depth: 2, .. }));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
