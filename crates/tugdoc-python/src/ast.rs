//! Ingestion snapshot loading and the node arena.
//!
//! The static-analysis collaborator hands over one nested JSON document per
//! run. [`AstTree::from_json`] flattens it into an index-addressed arena:
//! every node gets a [`NodeId`], children are stored as ordered id lists and
//! the parent back-reference is a plain id, never an owning pointer.
//!
//! Canonical paths are derived from the nesting (`parent.name`) and must be
//! unique; a duplicate is a fatal [`TugdocError::DuplicatePath`].
//!
//! ## Node kinds
//!
//! | Kind | Payload |
//! |------|---------|
//! | module | package flag derived from the file name |
//! | class | bases, decorators |
//! | function | parameters, returns, decorators, inherited flag |
//! | attribute | annotation, value, inherited flag |
//! | alias | target canonical path (absent if unresolvable), wildcard flag |

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tugdoc_core::error::{TugdocError, TugdocResult};

use crate::expr::Expr;

/// File name that marks a module as a package.
pub const INIT_FILENAME: &str = "__init__.py";

// ============================================================================
// Arena Types
// ============================================================================

/// Index of a node in the [`AstTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source location of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub filepath: Option<PathBuf>,
    pub lineno: Option<u32>,
    pub endlineno: Option<u32>,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Parameter kind as reported by the collaborator, e.g. `positional or keyword`.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub annotation: Option<Expr>,
    #[serde(default)]
    pub default: Option<Expr>,
}

/// Class payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassData {
    pub bases: Vec<Expr>,
    pub decorators: Vec<Expr>,
}

/// Function payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionData {
    pub parameters: Vec<Parameter>,
    pub returns: Option<Expr>,
    pub decorators: Vec<Expr>,
    pub inherited: bool,
}

/// Attribute payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeData {
    pub annotation: Option<Expr>,
    pub value: Option<Expr>,
    pub inherited: bool,
}

/// Alias (re-export) payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasData {
    /// Canonical path of the target; `None` when ingestion could not resolve it.
    pub target: Option<String>,
    /// `from x import *`
    pub wildcard: bool,
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module { is_package: bool },
    Class(ClassData),
    Function(FunctionData),
    Attribute(AttributeData),
    Alias(AliasData),
}

/// One node of the arena.
#[derive(Debug, Clone)]
pub struct AstNode {
    pub id: NodeId,
    pub name: String,
    /// Canonical dotted path, unique within the tree.
    pub path: String,
    pub parent: Option<NodeId>,
    /// Children in declaration order.
    pub children: Vec<NodeId>,
    pub docstring: Option<String>,
    pub location: Location,
    /// Raw source lines of the node.
    pub lines: Vec<String>,
    pub kind: NodeKind,
}

impl AstNode {
    /// Whether the node carries a non-blank docstring.
    pub fn has_docstring(&self) -> bool {
        self.docstring
            .as_deref()
            .is_some_and(|doc| !doc.trim().is_empty())
    }

    pub fn is_module(&self) -> bool {
        matches!(self.kind, NodeKind::Module { .. })
    }

    /// A module backed by an `__init__.py` file.
    pub fn is_package(&self) -> bool {
        matches!(self.kind, NodeKind::Module { is_package: true })
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.kind, NodeKind::Alias(_))
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, NodeKind::Class(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, NodeKind::Function(_))
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, NodeKind::Attribute(_))
    }

    /// Whether the member was inherited from a base class.
    pub fn is_inherited(&self) -> bool {
        match &self.kind {
            NodeKind::Function(data) => data.inherited,
            NodeKind::Attribute(data) => data.inherited,
            _ => false,
        }
    }

    /// Raw source joined with newlines.
    pub fn source(&self) -> String {
        self.lines.join("\n")
    }

    /// Kind name as used in the snapshot.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Module { .. } => "module",
            NodeKind::Class(_) => "class",
            NodeKind::Function(_) => "function",
            NodeKind::Attribute(_) => "attribute",
            NodeKind::Alias(_) => "alias",
        }
    }
}

// ============================================================================
// Snapshot Schema
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawKind {
    Module,
    Class,
    Function,
    Attribute,
    Alias,
}

/// One node as it appears in the snapshot document.
#[derive(Debug, Deserialize)]
struct RawNode {
    kind: RawKind,
    name: String,
    #[serde(default)]
    docstring: Option<String>,
    #[serde(default)]
    filepath: Option<PathBuf>,
    #[serde(default)]
    lineno: Option<u32>,
    #[serde(default)]
    endlineno: Option<u32>,
    #[serde(default)]
    lines: Vec<String>,
    #[serde(default)]
    members: Vec<RawNode>,
    #[serde(default)]
    bases: Vec<Expr>,
    #[serde(default)]
    decorators: Vec<Expr>,
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default)]
    returns: Option<Expr>,
    #[serde(default)]
    inherited: bool,
    #[serde(default)]
    annotation: Option<Expr>,
    #[serde(default)]
    value: Option<Expr>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    wildcard: bool,
}

impl RawNode {
    /// Split into payload, members and common fields. `filepath` is the
    /// effective path (own or inherited); the package flag only looks at
    /// the node's own path.
    fn into_parts(self, filepath: Option<PathBuf>) -> (NodeKind, Vec<RawNode>, AstNodeFields) {
        let kind = match self.kind {
            RawKind::Module => NodeKind::Module {
                is_package: self
                    .filepath
                    .as_deref()
                    .and_then(Path::file_name)
                    .is_some_and(|name| name == INIT_FILENAME),
            },
            RawKind::Class => NodeKind::Class(ClassData {
                bases: self.bases,
                decorators: self.decorators,
            }),
            RawKind::Function => NodeKind::Function(FunctionData {
                parameters: self.parameters,
                returns: self.returns,
                decorators: self.decorators,
                inherited: self.inherited,
            }),
            RawKind::Attribute => NodeKind::Attribute(AttributeData {
                annotation: self.annotation,
                value: self.value,
                inherited: self.inherited,
            }),
            RawKind::Alias => NodeKind::Alias(AliasData {
                target: self.target,
                wildcard: self.wildcard,
            }),
        };
        let fields = AstNodeFields {
            name: self.name,
            docstring: self.docstring,
            location: Location {
                filepath,
                lineno: self.lineno,
                endlineno: self.endlineno,
            },
            lines: self.lines,
        };
        (kind, self.members, fields)
    }
}

struct AstNodeFields {
    name: String,
    docstring: Option<String>,
    location: Location,
    lines: Vec<String>,
}

// ============================================================================
// AstTree
// ============================================================================

/// The immutable node arena of one run.
#[derive(Debug, Clone)]
pub struct AstTree {
    nodes: Vec<AstNode>,
    by_path: HashMap<String, NodeId>,
}

impl AstTree {
    /// Load a snapshot from a JSON file.
    pub fn from_path(path: &Path) -> TugdocResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| TugdocError::Snapshot {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    /// Load a snapshot from JSON text.
    pub fn from_json(content: &str) -> TugdocResult<Self> {
        let raw: RawNode = serde_json::from_str(content)
            .map_err(|e| TugdocError::snapshot(format!("malformed snapshot: {e}")))?;
        Self::from_raw(raw)
    }

    /// Load a snapshot from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> TugdocResult<Self> {
        let raw: RawNode = serde_json::from_value(value)
            .map_err(|e| TugdocError::snapshot(format!("malformed snapshot: {e}")))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawNode) -> TugdocResult<Self> {
        if !matches!(raw.kind, RawKind::Module) {
            return Err(TugdocError::snapshot("root node must be a module"));
        }
        let mut tree = AstTree {
            nodes: Vec::new(),
            by_path: HashMap::new(),
        };

        // Explicit stack; nesting depth is guarded by the traversals.
        let mut pending: Vec<(RawNode, Option<NodeId>)> = vec![(raw, None)];
        while let Some((raw, parent)) = pending.pop() {
            let id = tree.insert(raw, parent, &mut pending)?;
            if let Some(parent) = parent {
                tree.nodes[parent.index()].children.push(id);
            }
        }
        Ok(tree)
    }

    fn insert(
        &mut self,
        raw: RawNode,
        parent: Option<NodeId>,
        pending: &mut Vec<(RawNode, Option<NodeId>)>,
    ) -> TugdocResult<NodeId> {
        // Wildcard aliases are named after their dotted source, `pkg.impl/*`.
        let dotted_ok = matches!(raw.kind, RawKind::Alias);
        if raw.name.is_empty() || (raw.name.contains('.') && !dotted_ok) {
            return Err(TugdocError::snapshot(format!(
                "invalid node name '{}'",
                raw.name
            )));
        }

        let parent_node = parent.map(|id| &self.nodes[id.index()]);
        let path = match parent_node {
            Some(p) => format!("{}.{}", p.path, raw.name),
            None => raw.name.clone(),
        };
        if self.by_path.contains_key(&path) {
            return Err(TugdocError::DuplicatePath { path });
        }
        let filepath = raw
            .filepath
            .clone()
            .or_else(|| parent_node.and_then(|p| p.location.filepath.clone()));

        let id = NodeId(
            u32::try_from(self.nodes.len())
                .map_err(|_| TugdocError::snapshot("too many nodes in snapshot"))?,
        );
        let (kind, members, fields) = raw.into_parts(filepath);

        // Reverse so that popping yields declaration order.
        for member in members.into_iter().rev() {
            pending.push((member, Some(id)));
        }

        self.by_path.insert(path.clone(), id);
        self.nodes.push(AstNode {
            id,
            name: fields.name,
            path,
            parent,
            children: Vec::new(),
            docstring: fields.docstring,
            location: fields.location,
            lines: fields.lines,
            kind,
        });
        Ok(id)
    }

    /// The root module.
    pub fn root(&self) -> &AstNode {
        &self.nodes[0]
    }

    /// Name of the root module, i.e. the project namespace.
    pub fn root_name(&self) -> &str {
        &self.root().name
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    /// Look up a node by canonical path.
    pub fn get(&self, path: &str) -> Option<&AstNode> {
        self.by_path.get(path).map(|id| self.node(*id))
    }

    pub fn parent(&self, node: &AstNode) -> Option<&AstNode> {
        node.parent.map(|id| self.node(id))
    }

    /// Children of a node in declaration order.
    pub fn children<'a>(&'a self, node: &'a AstNode) -> impl Iterator<Item = &'a AstNode> + 'a {
        node.children.iter().map(move |id| self.node(*id))
    }

    /// Direct child by name.
    pub fn child<'a>(&'a self, node: &'a AstNode, name: &str) -> Option<&'a AstNode> {
        self.children(node).find(|child| child.name == name)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Directory of the root package, against which file paths are reported.
    pub fn root_dir(&self) -> Option<&Path> {
        self.root()
            .location
            .filepath
            .as_deref()
            .and_then(Path::parent)
    }

    /// File path of a node relative to the root package directory,
    /// `/`-separated. Falls back to the path as given when it lies outside.
    pub fn relative_file_path(&self, node: &AstNode) -> String {
        let Some(filepath) = node.location.filepath.as_deref() else {
            return String::new();
        };
        let relative = self
            .root_dir()
            .and_then(|dir| filepath.strip_prefix(dir).ok())
            .unwrap_or(filepath);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{attribute, class, function, module, package};

    fn sample() -> AstTree {
        AstTree::from_value(package(
            "pkg",
            "pkg/__init__.py",
            Some("Root."),
            vec![
                package("sub", "pkg/sub/__init__.py", Some("Sub."), vec![]),
                module(
                    "mod",
                    "pkg/mod.py",
                    None,
                    vec![
                        class("Klass", Some("A class."), vec![function("run", Some("Run."))]),
                        attribute("VALUE", Some("A value.")),
                    ],
                ),
            ],
        ))
        .unwrap()
    }

    mod loading {
        use super::*;

        #[test]
        fn canonical_paths_follow_nesting() {
            let tree = sample();
            assert_eq!(tree.root_name(), "pkg");
            assert!(tree.get("pkg.mod.Klass.run").is_some());
            assert!(tree.get("pkg.sub").unwrap().is_package());
            assert!(!tree.get("pkg.mod").unwrap().is_package());
        }

        #[test]
        fn children_keep_declaration_order() {
            let tree = sample();
            let names: Vec<&str> = tree
                .children(tree.root())
                .map(|child| child.name.as_str())
                .collect();
            assert_eq!(names, vec!["sub", "mod"]);
        }

        #[test]
        fn parent_is_an_arena_key() {
            let tree = sample();
            let method = tree.get("pkg.mod.Klass.run").unwrap();
            let parent = tree.parent(method).unwrap();
            assert_eq!(parent.path, "pkg.mod.Klass");
            assert_eq!(tree.parent(tree.root()).map(|p| p.path.clone()), None);
        }

        #[test]
        fn wildcard_alias_keeps_dotted_source_name() {
            let tree = AstTree::from_value(package(
                "pkg",
                "pkg/__init__.py",
                Some("Root."),
                vec![module(
                    "api",
                    "pkg/api.py",
                    None,
                    vec![serde_json::json!({
                        "kind": "alias",
                        "name": "pkg.impl/*",
                        "target": "pkg.impl",
                        "wildcard": true,
                    })],
                )],
            ))
            .unwrap();
            let api = tree.get("pkg.api").unwrap();
            let star = tree.child(api, "pkg.impl/*").unwrap();
            assert!(star.is_alias());
            assert_eq!(star.path, "pkg.api.pkg.impl/*");
        }

        #[test]
        fn filepath_is_inherited_from_parent() {
            let tree = sample();
            let method = tree.get("pkg.mod.Klass.run").unwrap();
            assert_eq!(
                method.location.filepath.as_deref(),
                Some(Path::new("pkg/mod.py"))
            );
            assert_eq!(tree.relative_file_path(method), "mod.py");
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn duplicate_path_is_fatal() {
            let err = AstTree::from_value(module(
                "pkg",
                "pkg/__init__.py",
                None,
                vec![function("f", None), function("f", None)],
            ))
            .unwrap_err();
            assert!(matches!(err, TugdocError::DuplicatePath { path } if path == "pkg.f"));
        }

        #[test]
        fn dotted_name_is_rejected_outside_aliases() {
            let err = AstTree::from_value(module(
                "pkg",
                "pkg/__init__.py",
                None,
                vec![function("a.b", None)],
            ))
            .unwrap_err();
            assert!(matches!(err, TugdocError::Snapshot { .. }));
        }

        #[test]
        fn root_must_be_module() {
            let err = AstTree::from_value(function("f", None)).unwrap_err();
            assert!(matches!(err, TugdocError::Snapshot { .. }));
        }

        #[test]
        fn malformed_json_is_snapshot_error() {
            let err = AstTree::from_json("{\"kind\": \"module\"").unwrap_err();
            assert_eq!(err.error_code().code(), 3);
        }
    }

    #[test]
    fn docstring_presence_ignores_blank_text() {
        let tree = AstTree::from_value(module(
            "pkg",
            "pkg/__init__.py",
            Some("   \n"),
            vec![],
        ))
        .unwrap();
        assert!(!tree.root().has_docstring());
    }
}
