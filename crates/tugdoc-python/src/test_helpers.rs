//! Synthetic snapshot builders for tests.
//!
//! Each helper returns the JSON value of one snapshot node, so trees can be
//! written inline and loaded with [`AstTree::from_value`](crate::ast::AstTree::from_value).
//! Fields not covered by a helper can be patched on the returned value.

use serde_json::{json, Value};

use crate::ast::AstTree;

/// A package node (backed by `__init__.py` at `filepath`).
pub fn package(name: &str, filepath: &str, docstring: Option<&str>, members: Vec<Value>) -> Value {
    module(name, filepath, docstring, members)
}

/// A module node; it is a package iff `filepath` ends in `__init__.py`.
pub fn module(name: &str, filepath: &str, docstring: Option<&str>, members: Vec<Value>) -> Value {
    json!({
        "kind": "module",
        "name": name,
        "docstring": docstring,
        "filepath": filepath,
        "members": members,
    })
}

/// A class node with source lines derived from its name and docstring.
pub fn class(name: &str, docstring: Option<&str>, members: Vec<Value>) -> Value {
    let mut lines = vec![format!("class {name}:")];
    if let Some(doc) = docstring {
        lines.push(format!("    \"\"\"{doc}\"\"\""));
    }
    json!({
        "kind": "class",
        "name": name,
        "docstring": docstring,
        "lineno": 1,
        "endlineno": lines.len(),
        "lines": lines,
        "members": members,
    })
}

/// A function node without parameters.
pub fn function(name: &str, docstring: Option<&str>) -> Value {
    let mut lines = vec![format!("def {name}():")];
    if let Some(doc) = docstring {
        lines.push(format!("    \"\"\"{doc}\"\"\""));
    }
    lines.push("    pass".to_string());
    json!({
        "kind": "function",
        "name": name,
        "docstring": docstring,
        "lineno": 1,
        "endlineno": lines.len(),
        "lines": lines,
    })
}

/// An attribute node assigned a constant.
pub fn attribute(name: &str, docstring: Option<&str>) -> Value {
    json!({
        "kind": "attribute",
        "name": name,
        "docstring": docstring,
        "lineno": 1,
        "endlineno": 1,
        "lines": [format!("{name} = 1")],
        "value": {"kind": "constant", "value": "1"},
    })
}

/// An explicit re-export `from x import name` of `target`.
pub fn alias(name: &str, target: Option<&str>) -> Value {
    json!({
        "kind": "alias",
        "name": name,
        "target": target,
        "wildcard": false,
    })
}

/// A wildcard re-export `from target import *`, named `target/*`.
pub fn wildcard(target: Option<&str>) -> Value {
    let name = format!("{}/*", target.unwrap_or("unknown"));
    json!({
        "kind": "alias",
        "name": name,
        "target": target,
        "wildcard": true,
    })
}

/// A name expression.
pub fn name_expr(name: &str, path: &str) -> Value {
    json!({"kind": "name", "name": name, "path": path})
}

/// Set a field on a node value.
pub fn with(mut node: Value, key: &str, value: Value) -> Value {
    if let Some(object) = node.as_object_mut() {
        object.insert(key.to_string(), value);
    }
    node
}

/// A chain of `depth` nested documented packages below `root`.
pub fn nested_packages(root: &str, depth: usize) -> Value {
    let mut node = Value::Null;
    for level in (1..=depth).rev() {
        let mut dir = root.to_string();
        for i in 1..=level {
            dir.push_str(&format!("/p{i}"));
        }
        let members = if node.is_null() { vec![] } else { vec![node] };
        node = package(
            &format!("p{level}"),
            &format!("{dir}/__init__.py"),
            Some("Nested package."),
            members,
        );
    }
    let members = if node.is_null() { vec![] } else { vec![node] };
    package(root, &format!("{root}/__init__.py"), Some("Root."), members)
}

/// Load a tree from a value, panicking on malformed input.
pub fn tree(value: Value) -> AstTree {
    AstTree::from_value(value).unwrap_or_else(|e| panic!("invalid test snapshot: {e}"))
}
