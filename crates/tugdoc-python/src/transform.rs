//! Snapshot nodes to documentation nodes.
//!
//! | Node | Output | Role |
//! |------|--------|------|
//! | package | [`Module`] | `module` |
//! | plain module file | [`File`] | - |
//! | class | [`Type`] | `class` |
//! | module-level function | [`Callable`] | `function` |
//! | method | [`Callable`] | `method` |
//! | module-level attribute | [`Attribute`] | `global` |
//! | class attribute | [`Attribute`] | `attribute` |
//!
//! Every docstring text goes through [`Project::replace_links`] before it is
//! stored. Output `path` fields are canonical paths relative to the root,
//! except child module entries which keep the full canonical path.

use tracing::debug;
use tugdoc_core::diagnostics::Diagnostics;
use tugdoc_core::output::{
    roles, Attribute, Callable, ChildModule, Documentation, DocumentationSection, File, Module,
    Semantic, Type,
};

use crate::ast::{AstNode, NodeKind};
use crate::code::extract_code;
use crate::docstring::{parse_google, DocParameter, DocstringSection};
use crate::elements::{class_attributes, class_methods, extract_module, is_leaf_module};
use crate::expr::collect_names;
use crate::project::Project;
use crate::symbols::relative_path;

/// Title of the parameters section of a callable.
pub const ARGUMENTS_TITLE: &str = "Arguments";

/// Title of the returns section of a callable.
pub const RETURNS_TITLE: &str = "Returns";

/// Relation listing the canonical paths of a class's bases.
pub const INHERITS_RELATION: &str = "inherits";

// ============================================================================
// Modules
// ============================================================================

/// Build the documentation node of a module.
///
/// Child modules are listed but not transformed; the caller recurses.
pub fn transform_module(
    project: &Project<'_>,
    module: &AstNode,
    diagnostics: &mut Diagnostics,
) -> Module {
    debug!("transforming module {}", module.path);
    let tree = project.tree;
    let elements = extract_module(tree, module);

    let children = elements
        .modules
        .iter()
        .map(|child| ChildModule {
            name: child.name.clone(),
            path: child.path.clone(),
            is_leaf: is_leaf_module(tree, child),
        })
        .collect();

    let mut attributes: Vec<Attribute> = elements
        .attributes
        .iter()
        .map(|attribute| transform_attribute(project, attribute, roles::GLOBAL, diagnostics))
        .collect();
    attributes.sort_by(|a, b| a.name.cmp(&b.name));

    let types = elements
        .classes
        .iter()
        .map(|class| transform_class(project, class, diagnostics))
        .collect();
    let callables = elements
        .functions
        .iter()
        .map(|function| transform_callable(project, function, roles::FUNCTION, diagnostics))
        .collect();
    let files = elements
        .files
        .iter()
        .map(|file| transform_file(project, file, diagnostics))
        .collect();

    Module {
        name: module.name.clone(),
        path: output_path(project, module),
        semantic: Semantic::role(roles::MODULE),
        children,
        attributes,
        types,
        callables,
        files,
        documentation: documentation(project, module, diagnostics),
    }
}

/// Build the entry of a plain module file.
///
/// Files without a docstring are tolerated.
pub fn transform_file(project: &Project<'_>, file: &AstNode, diagnostics: &mut Diagnostics) -> File {
    File {
        name: file.name.clone(),
        path: project.tree.relative_file_path(file),
        documentation: documentation(project, file, diagnostics),
    }
}

// ============================================================================
// Classes, Callables, Attributes
// ============================================================================

/// Build the documentation node of a class with its own documented members.
pub fn transform_class(project: &Project<'_>, class: &AstNode, diagnostics: &mut Diagnostics) -> Type {
    let bases = match &class.kind {
        NodeKind::Class(data) => collect_names(&data.bases)
            .into_iter()
            .map(|name| name.path)
            .collect(),
        _ => Vec::new(),
    };
    let semantic = Semantic::role(roles::CLASS).with_relation(INHERITS_RELATION, bases);

    let tree = project.tree;
    let attributes = class_attributes(tree, class)
        .into_iter()
        .map(|attribute| transform_attribute(project, attribute, roles::ATTRIBUTE, diagnostics))
        .collect();
    let callables = class_methods(tree, class)
        .into_iter()
        .map(|method| transform_callable(project, method, roles::METHOD, diagnostics))
        .collect();

    Type {
        name: class.name.clone(),
        documentation: documentation(project, class, diagnostics),
        path: output_path(project, class),
        semantic,
        attributes,
        callables,
        code: extract_code(project, class, diagnostics),
    }
}

/// Build the documentation node of a function or method.
///
/// Sections are ordered body, returns, parameters.
pub fn transform_callable(
    project: &Project<'_>,
    function: &AstNode,
    role: &str,
    diagnostics: &mut Diagnostics,
) -> Callable {
    Callable {
        name: function.name.clone(),
        documentation: documentation(project, function, diagnostics),
        path: output_path(project, function),
        code: extract_code(project, function, diagnostics),
        semantic: Semantic::role(role),
    }
}

/// Build the documentation node of an attribute.
pub fn transform_attribute(
    project: &Project<'_>,
    attribute: &AstNode,
    role: &str,
    diagnostics: &mut Diagnostics,
) -> Attribute {
    Attribute {
        name: attribute.name.clone(),
        semantic: Semantic::role(role),
        documentation: documentation(project, attribute, diagnostics),
        path: output_path(project, attribute),
        code: extract_code(project, attribute, diagnostics),
    }
}

fn output_path(project: &Project<'_>, node: &AstNode) -> String {
    relative_path(project.root_name(), &node.path).to_string()
}

// ============================================================================
// Documentation
// ============================================================================

/// Parse and render the docstring of a node.
///
/// A missing docstring is recorded for everything but plain files. Sections
/// that fail to parse are recorded against the node and omitted. Only
/// functions keep parameters and returns sections.
fn documentation(project: &Project<'_>, node: &AstNode, diagnostics: &mut Diagnostics) -> Documentation {
    if !node.has_docstring() {
        if node.is_package() || !node.is_module() {
            diagnostics.add_no_docstring(&node.path);
        }
        return Documentation::default();
    }
    let parsed = parse_google(node.docstring.as_deref().unwrap_or_default());
    for error in &parsed.errors {
        debug!("{}: section omitted: {}", node.path, error);
        diagnostics.add_error(&node.path, error.to_string());
    }

    let parent = node.path.as_str();
    let is_function = node.is_function();
    let mut sections: Vec<(SectionRank, DocumentationSection)> = parsed
        .sections
        .into_iter()
        .filter(|section| {
            is_function
                || matches!(
                    section,
                    DocstringSection::Text(_) | DocstringSection::Admonition { .. }
                )
        })
        .map(|section| match section {
            DocstringSection::Text(text) => (
                SectionRank::Body,
                DocumentationSection::markdown(
                    None,
                    project.replace_links(&text, parent, diagnostics),
                    Semantic::role(roles::TEXT),
                ),
            ),
            DocstringSection::Admonition { title, tag, body } => (
                SectionRank::Body,
                DocumentationSection::markdown(
                    Some(title),
                    project.replace_links(&body, parent, diagnostics),
                    Semantic::role(roles::ADMONITION).with_attribute("tag", tag),
                ),
            ),
            DocstringSection::Returns(value) => (
                SectionRank::Returns,
                DocumentationSection::markdown(
                    Some(RETURNS_TITLE.to_string()),
                    project.replace_links(&value.description, parent, diagnostics),
                    Semantic::role(roles::RETURNS),
                ),
            ),
            DocstringSection::Parameters(items) => (
                SectionRank::Parameters,
                DocumentationSection::markdown(
                    Some(ARGUMENTS_TITLE.to_string()),
                    parameter_list(project, &items, parent, diagnostics),
                    Semantic::role(roles::ARGUMENTS),
                ),
            ),
        })
        .collect();

    if is_function {
        sections.sort_by_key(|(rank, _)| *rank);
    }
    Documentation {
        sections: sections.into_iter().map(|(_, section)| section).collect(),
    }
}

/// Position class of a section in a callable's documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SectionRank {
    Body,
    Returns,
    Parameters,
}

/// Markdown list of parameters, one `\n*  **name**: description` per entry.
fn parameter_list(
    project: &Project<'_>,
    items: &[DocParameter],
    parent: &str,
    diagnostics: &mut Diagnostics,
) -> String {
    items.iter().fold(String::new(), |mut content, item| {
        let description = project.replace_links(&item.description, parent, diagnostics);
        content.push_str(&format!("\n*  **{}**: {}", item.name, description));
        content
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstTree;
    use crate::test_helpers::{attribute, class, function, module, name_expr, package, tree, with};
    use serde_json::json;
    use tugdoc_core::config::Config;

    const MAKE_DOC: &str = "Make a :class:`Widget <pkg.core.Widget>`.\n\nArgs:\n    name: Widget name.\n    size: Initial size,\n        in pixels.\n\nReturns:\n    A new widget.\n\nNote:\n    Cheap.";

    fn sample() -> AstTree {
        let widget = with(
            class(
                "Widget",
                Some("A widget."),
                vec![
                    function("render", Some("Render it.")),
                    with(function("base_method", Some("Base.")), "inherited", json!(true)),
                    function("undocumented", None),
                    attribute("size", Some("Size.")),
                ],
            ),
            "bases",
            json!([name_expr("Base", "pkg.core.Base")]),
        );
        tree(package(
            "pkg",
            "pkg/__init__.py",
            Some("Root package."),
            vec![
                module(
                    "core",
                    "pkg/core.py",
                    Some("Core file."),
                    vec![
                        attribute("ZETA", Some("Last.")),
                        attribute("ALPHA", Some("First.")),
                        widget,
                        class("Empty", Some("Nothing inside."), vec![]),
                        function("make", Some(MAKE_DOC)),
                        function("broken", Some("Do.\n\nArgs:\n    not a valid entry!")),
                    ],
                ),
                package(
                    "sub",
                    "pkg/sub/__init__.py",
                    Some("Sub package."),
                    vec![package("leaf", "pkg/sub/leaf/__init__.py", Some("Leaf."), vec![])],
                ),
                package("hidden", "pkg/hidden/__init__.py", None, vec![]),
                module("plain", "pkg/plain.py", None, vec![]),
            ],
        ))
    }

    fn project(tree: &AstTree) -> Project<'_> {
        Project::build(tree, &Config::default(), &mut Diagnostics::new()).unwrap()
    }

    mod modules {
        use super::*;

        #[test]
        fn module_layout() {
            let tree = sample();
            let project = project(&tree);
            let mut diagnostics = Diagnostics::new();
            let module = transform_module(&project, tree.root(), &mut diagnostics);

            assert_eq!(module.name, "pkg");
            assert_eq!(module.path, "pkg");
            assert_eq!(module.semantic.role, roles::MODULE);

            let attributes: Vec<_> = module.attributes.iter().map(|a| a.name.as_str()).collect();
            assert_eq!(attributes, ["ALPHA", "ZETA"]);
            assert!(module.attributes.iter().all(|a| a.semantic.role == roles::GLOBAL));

            let types: Vec<_> = module.types.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(types, ["Widget", "Empty"]);
            let callables: Vec<_> = module.callables.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(callables, ["make", "broken"]);
            assert!(module.callables.iter().all(|c| c.semantic.role == roles::FUNCTION));
        }

        #[test]
        fn children_and_files() {
            let tree = sample();
            let project = project(&tree);
            let mut diagnostics = Diagnostics::new();
            let module = transform_module(&project, tree.root(), &mut diagnostics);

            assert_eq!(
                module.children,
                vec![ChildModule {
                    name: "sub".to_string(),
                    path: "pkg.sub".to_string(),
                    is_leaf: false,
                }]
            );
            let sub = transform_module(&project, tree.get("pkg.sub").unwrap(), &mut diagnostics);
            assert_eq!(sub.path, "sub");
            assert!(sub.children[0].is_leaf);

            let files: Vec<_> = module
                .files
                .iter()
                .map(|f| (f.name.as_str(), f.path.as_str()))
                .collect();
            assert_eq!(files, [("core", "core.py"), ("plain", "plain.py")]);
            assert_eq!(module.files[0].documentation.sections[0].content, "Core file.");
            assert!(module.files[1].documentation.sections.is_empty());
        }

        #[test]
        fn undocumented_package_is_reported_but_plain_file_is_not() {
            let tree = tree(package(
                "pkg",
                "pkg/__init__.py",
                None,
                vec![module("plain", "pkg/plain.py", None, vec![])],
            ));
            let project = project(&tree);
            let mut diagnostics = Diagnostics::new();
            let module = transform_module(&project, tree.root(), &mut diagnostics);

            assert!(module.documentation.sections.is_empty());
            assert!(diagnostics.no_docstrings().contains("pkg"));
            assert!(!diagnostics.no_docstrings().contains("pkg.plain"));
        }
    }

    mod classes {
        use super::*;

        #[test]
        fn own_documented_members_only() {
            let tree = sample();
            let project = project(&tree);
            let mut diagnostics = Diagnostics::new();
            let widget = transform_class(&project, tree.get("pkg.core.Widget").unwrap(), &mut diagnostics);

            assert_eq!(widget.path, "core.Widget");
            assert_eq!(widget.semantic.relations[INHERITS_RELATION], ["pkg.core.Base"]);
            let methods: Vec<_> = widget.callables.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(methods, ["render"]);
            assert_eq!(widget.callables[0].semantic.role, roles::METHOD);
            assert_eq!(widget.callables[0].path, "core.Widget.render");
            assert_eq!(widget.attributes.len(), 1);
            assert_eq!(widget.attributes[0].semantic.role, roles::ATTRIBUTE);
        }

        #[test]
        fn class_docstring_keeps_text_and_admonitions_only() {
            let tree = tree(package(
                "pkg",
                "pkg/__init__.py",
                Some("Root."),
                vec![module(
                    "core",
                    "pkg/core.py",
                    None,
                    vec![class(
                        "Point",
                        Some("A point.\n\nArgs:\n    x: Abscissa.\n\nReturns:\n    Nothing.\n\nNote:\n    Immutable."),
                        vec![],
                    )],
                )],
            ));
            let project = project(&tree);
            let mut diagnostics = Diagnostics::new();
            let point = transform_class(&project, tree.get("pkg.core.Point").unwrap(), &mut diagnostics);

            let titles: Vec<_> = point
                .documentation
                .sections
                .iter()
                .map(|s| s.title.as_deref())
                .collect();
            assert_eq!(titles, [None, Some("Note")]);
            assert!(diagnostics.errors().is_empty());
        }

        #[test]
        fn empty_class_is_a_valid_node() {
            let tree = sample();
            let project = project(&tree);
            let mut diagnostics = Diagnostics::new();
            let empty = transform_class(&project, tree.get("pkg.core.Empty").unwrap(), &mut diagnostics);

            assert!(empty.attributes.is_empty());
            assert!(empty.callables.is_empty());
            assert_eq!(empty.code.declaration, "class Empty");
            assert_eq!(empty.semantic.relations[INHERITS_RELATION], Vec::<String>::new());
            assert!(diagnostics.errors().is_empty());
        }
    }

    mod callables {
        use super::*;

        #[test]
        fn sections_are_body_returns_parameters() {
            let tree = sample();
            let project = project(&tree);
            let mut diagnostics = Diagnostics::new();
            let make = transform_callable(
                &project,
                tree.get("pkg.core.make").unwrap(),
                roles::FUNCTION,
                &mut diagnostics,
            );

            let sections = &make.documentation.sections;
            let titles: Vec<_> = sections.iter().map(|s| s.title.as_deref()).collect();
            assert_eq!(titles, [None, Some("Note"), Some("Returns"), Some("Arguments")]);
            let roles: Vec<_> = sections.iter().map(|s| s.semantic.role.as_str()).collect();
            assert_eq!(roles, ["text", "admonition", "returns", "arguments"]);

            assert_eq!(sections[0].content, "Make a [Widget](@nav/api/core.Widget).");
            assert_eq!(sections[1].semantic.attributes["tag"].as_deref(), Some("note"));
            assert_eq!(sections[2].content, "A new widget.");
            assert_eq!(
                sections[3].content,
                "\n*  **name**: Widget name.\n*  **size**: Initial size,\nin pixels."
            );
        }

        #[test]
        fn malformed_section_is_omitted_and_recorded() {
            let tree = sample();
            let project = project(&tree);
            let mut diagnostics = Diagnostics::new();
            let broken = transform_callable(
                &project,
                tree.get("pkg.core.broken").unwrap(),
                roles::FUNCTION,
                &mut diagnostics,
            );

            assert_eq!(broken.documentation.sections.len(), 1);
            assert_eq!(broken.documentation.sections[0].content, "Do.");
            assert!(diagnostics.errors()["pkg.core.broken"]
                .contains("malformed entry in Args section: 'not a valid entry!'"));
        }
    }
}
