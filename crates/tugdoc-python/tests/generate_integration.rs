//! End-to-end tests for documentation generation.
//!
//! Each test builds a synthetic snapshot, runs [`generate_api`] into a
//! temporary directory and inspects the written JSON files.
//!
//! # Running These Tests
//!
//! ```bash
//! cargo nextest run -p tugdoc-python generate_integration
//! ```

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;

use tugdoc_core::config::Config;
use tugdoc_core::diagnostics::Diagnostics;
use tugdoc_python::test_helpers::{alias, class, function, module, name_expr, package, tree, with};
use tugdoc_python::{generate_api, AstTree, Project};

// ============================================================================
// Test Infrastructure
// ============================================================================

const MAKE_DOC: &str = "Build a :class:`pkg.api.Thing`.\n\nSee :meth:`pkg.sub.shapes.Circle.area`, :func:`pkg.impl.missing`\nand :class:`pathlib.Path`.\n\nArgs:\n    size: Size of the :class:`Thing`.\n\nReturns:\n    The new thing.";

/// A package re-exporting a class through two levels of aliases, with a
/// nested package holding a class with a method.
fn sample_tree() -> AstTree {
    let make = with(
        function("make", Some(MAKE_DOC)),
        "returns",
        name_expr("Thing", "pkg.impl.Thing"),
    );
    let circle = with(
        class(
            "Circle",
            Some("A circle."),
            vec![function("area", Some("Area of the circle."))],
        ),
        "bases",
        json!([name_expr("Shape", "pkg.sub.shapes.Shape")]),
    );
    tree(package(
        "pkg",
        "src/pkg/__init__.py",
        Some("The package."),
        vec![
            module(
                "impl",
                "src/pkg/impl.py",
                Some("Implementation."),
                vec![class("Thing", Some("A thing."), vec![]), make],
            ),
            package(
                "sub",
                "src/pkg/sub/__init__.py",
                Some("Sub package."),
                vec![
                    alias("Thing", Some("pkg.impl.Thing")),
                    module(
                        "shapes",
                        "src/pkg/sub/shapes.py",
                        None,
                        vec![class("Shape", Some("A shape."), vec![]), circle],
                    ),
                ],
            ),
            module(
                "api",
                "src/pkg/api.py",
                None,
                vec![alias("Thing", Some("pkg.sub.Thing"))],
            ),
        ],
    ))
}

fn config(out: &TempDir) -> Config {
    Config {
        out: out.path().to_path_buf(),
        ..Config::default()
    }
}

fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Run a generation and return the root module document.
fn generate_root(out: &TempDir, diagnostics: &mut Diagnostics) -> Value {
    let tree = sample_tree();
    generate_api(&tree, &config(out), diagnostics).unwrap();
    read_json(&out.path().join("pkg.json"))
}

fn make_sections(root: &Value) -> &Vec<Value> {
    root["callables"][0]["documentation"]["sections"]
        .as_array()
        .unwrap()
}

// ============================================================================
// Alias Transitivity
// ============================================================================

mod aliases {
    use super::*;

    #[test]
    fn alias_of_alias_resolves_to_the_definition() {
        let tree = sample_tree();
        let project = Project::build(&tree, &Config::default(), &mut Diagnostics::new()).unwrap();
        let mut diagnostics = Diagnostics::new();

        let through_api = project.resolve_path("pkg.api.Thing", &mut diagnostics);
        let direct = project.resolve_path("pkg.impl.Thing", &mut diagnostics);
        assert_eq!(through_api, direct);
        assert_eq!(direct.as_deref(), Some("@nav/api/impl.Thing"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn tag_through_alias_renders_definition_link() {
        let out = TempDir::new().unwrap();
        let root = generate_root(&out, &mut Diagnostics::new());
        let body = make_sections(&root)[0]["content"].as_str().unwrap();
        assert!(body.starts_with("Build a [Thing](@nav/api/impl.Thing)."), "{body}");
    }
}

// ============================================================================
// Link Rendering
// ============================================================================

mod links {
    use super::*;

    #[test]
    fn method_tag_uses_member_navigation_path() {
        let out = TempDir::new().unwrap();
        let root = generate_root(&out, &mut Diagnostics::new());
        let body = make_sections(&root)[0]["content"].as_str().unwrap();
        assert!(body.contains("[area](@nav/api/sub/shapes.Circle.area)"), "{body}");
    }

    #[test]
    fn unknown_internal_tag_renders_label_and_one_diagnostic() {
        let out = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new();
        let root = generate_root(&out, &mut diagnostics);
        let body = make_sections(&root)[0]["content"].as_str().unwrap();

        assert!(body.contains(", missing\nand"), "{body}");
        let internal: Vec<_> = diagnostics
            .internal_cross_ref_errors()
            .iter()
            .filter(|path| path.as_str() == "pkg.impl.missing")
            .collect();
        assert_eq!(internal.len(), 1);
    }

    #[test]
    fn external_tag_uses_link_table() {
        let out = TempDir::new().unwrap();
        let root = generate_root(&out, &mut Diagnostics::new());
        let body = make_sections(&root)[0]["content"].as_str().unwrap();
        assert!(body.contains(
            "[Path](https://docs.python.org/3/library/pathlib.html#pathlib.Path)"
        ));
    }

    #[test]
    fn shorthand_is_never_auto_resolved() {
        let out = TempDir::new().unwrap();
        let mut diagnostics = Diagnostics::new();
        let root = generate_root(&out, &mut diagnostics);
        let arguments = &make_sections(&root)[2];

        assert_eq!(arguments["title"], "Arguments");
        assert_eq!(arguments["content"], "\n*  **size**: Size of the Thing.");
        let key = "pkg.impl.make=>:class:`Thing`";
        assert_eq!(diagnostics.unresolved_links()[key], ["impl.Thing"]);
    }
}

// ============================================================================
// Output Documents
// ============================================================================

mod documents {
    use super::*;

    #[test]
    fn root_document_layout() {
        let out = TempDir::new().unwrap();
        let root = generate_root(&out, &mut Diagnostics::new());

        assert_eq!(root["name"], "pkg");
        assert_eq!(root["semantic"]["role"], "module");
        assert_eq!(
            root["children"],
            json!([{"name": "sub", "path": "pkg.sub", "isLeaf": true}])
        );
        assert_eq!(root["types"][0]["path"], "impl.Thing");
        assert_eq!(root["files"][0]["path"], "impl.py");
        assert_eq!(root["files"][1]["name"], "api");

        let make = &root["callables"][0];
        assert_eq!(make["code"]["filePath"], "impl.py");
        assert_eq!(make["code"]["declaration"], "def make()");
        assert_eq!(make["code"]["references"]["Thing"], "@nav/api/impl.Thing");
        assert_eq!(make["documentation"]["sections"][0]["contentType"], "Markdown");
    }

    #[test]
    fn nested_package_document() {
        let out = TempDir::new().unwrap();
        generate_root(&out, &mut Diagnostics::new());
        let sub = read_json(&out.path().join("pkg/sub.json"));

        assert_eq!(sub["path"], "sub");
        let circle = &sub["types"][1];
        assert_eq!(circle["name"], "Circle");
        assert_eq!(
            circle["semantic"]["relations"]["inherits"],
            json!(["pkg.sub.shapes.Shape"])
        );
        assert_eq!(circle["callables"][0]["semantic"]["role"], "method");
        assert_eq!(circle["code"]["references"]["Shape"], "@nav/api/sub/shapes.Shape");
        assert_eq!(sub["types"][0]["attributes"], json!([]));
    }

    #[test]
    fn reruns_are_byte_identical() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let tree = sample_tree();
        let a = generate_api(&tree, &config(&first), &mut Diagnostics::new()).unwrap();
        let b = generate_api(&tree, &config(&second), &mut Diagnostics::new()).unwrap();
        assert_eq!(a.files_written.len(), b.files_written.len());

        for (left, right) in a.files_written.iter().zip(&b.files_written) {
            assert_eq!(
                left.strip_prefix(first.path()).unwrap(),
                right.strip_prefix(second.path()).unwrap()
            );
            assert_eq!(fs::read(left).unwrap(), fs::read(right).unwrap());
        }
    }
}
