//! Code snippets of documented symbols.
//!
//! For classes and functions the snippet holds the full implementation and
//! a declaration view cut from it; attributes only get a declaration.
//!
//! | Node | Declaration |
//! |------|-------------|
//! | function | from `def` / `async def` to the header colon, decorators excluded |
//! | class | everything before the docstring opening, trailing colon stripped |
//! | attribute | the source lines |
//!
//! References are collected only from the fields known to carry types:
//! decorators and bases of classes, parameter and return annotations of
//! functions, annotation and value of attributes. Classes and functions
//! also reference themselves.

use std::collections::BTreeMap;

use tugdoc_core::diagnostics::Diagnostics;
use tugdoc_core::output::Code;

use crate::ast::{AstNode, NodeKind};
use crate::expr::{collect_names, Expr};
use crate::project::Project;

/// Build the code snippet of a class, function or attribute.
pub fn extract_code(project: &Project<'_>, node: &AstNode, diagnostics: &mut Diagnostics) -> Code {
    let source = node.source();
    let (declaration, implementation) = match node.kind {
        NodeKind::Function(_) => (function_declaration(&source), Some(source)),
        NodeKind::Class(_) => (
            class_declaration(&source, node.has_docstring()),
            Some(source),
        ),
        _ => (source, None),
    };

    let mut references = BTreeMap::new();
    for name in collect_names(reference_exprs(node)) {
        let link = project.resolve_path(&name.path, diagnostics);
        references.insert(name.name, link);
    }
    if matches!(node.kind, NodeKind::Function(_) | NodeKind::Class(_)) {
        let link = project.resolve_path(&node.path, diagnostics);
        references.insert(node.name.clone(), link);
    }

    Code {
        file_path: project.tree.relative_file_path(node),
        start_line: node.location.lineno,
        end_line: node.location.endlineno,
        declaration,
        implementation,
        references,
    }
}

/// Type-bearing fields of a node.
fn reference_exprs(node: &AstNode) -> Vec<&Expr> {
    match &node.kind {
        NodeKind::Class(data) => data.decorators.iter().chain(&data.bases).collect(),
        NodeKind::Function(data) => data
            .parameters
            .iter()
            .filter_map(|p| p.annotation.as_ref())
            .chain(&data.returns)
            .collect(),
        NodeKind::Attribute(data) => data.annotation.iter().chain(&data.value).collect(),
        NodeKind::Module { .. } | NodeKind::Alias(_) => Vec::new(),
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Function signature without decorators and without the trailing colon.
pub fn function_declaration(source: &str) -> String {
    let Some(start) = keyword_offset(source, &["async def ", "def "]) else {
        return source.trim().to_string();
    };
    let end = header_colon(source, start).unwrap_or(source.len());
    source[start..end].trim_end().to_string()
}

/// Class header (decorators included) without the trailing colon.
///
/// Cut just before the docstring when the class has one, otherwise at the
/// header colon.
pub fn class_declaration(source: &str, has_docstring: bool) -> String {
    let docstring_start = if has_docstring {
        [source.find("\"\"\""), source.find("'''")]
            .into_iter()
            .flatten()
            .min()
    } else {
        None
    };
    let head = match docstring_start {
        Some(index) => {
            let prefix = source[..index]
                .chars()
                .rev()
                .take_while(|c| STRING_PREFIXES.contains(*c))
                .count();
            &source[..index - prefix]
        }
        None => {
            let start = keyword_offset(source, &["class "]).unwrap_or(0);
            &source[..header_colon(source, start).unwrap_or(source.len())]
        }
    };
    let head = head.trim_end();
    head.strip_suffix(':').unwrap_or(head).trim_end().to_string()
}

/// String literal prefix letters (`r"""`, `u'''`, ...).
const STRING_PREFIXES: &str = "rRuUbBfF";

/// Byte offset of the first line starting with one of `keywords`, pointing
/// at the keyword itself.
fn keyword_offset(source: &str, keywords: &[&str]) -> Option<usize> {
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if keywords.iter().any(|k| trimmed.starts_with(k)) {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// Offset of the first `:` at bracket depth zero and outside string
/// literals, scanning from `start`.
fn header_colon(source: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, ch) in source[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return Some(start + i),
            _ => {}
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
