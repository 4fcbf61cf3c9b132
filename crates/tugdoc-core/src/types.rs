//! Shared symbol types.
//!
//! [`SymbolKind`] and [`SymbolRef`] describe one entry of the project symbol
//! table. The navigation path of a symbol is a pure function of its
//! (root-relative) canonical path and its kind, see [`navigation_path`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Symbol Kind
// ============================================================================

/// Kind of a documented symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// A package or a plain module file.
    Module,
    /// A class declared in a module file.
    Class,
    /// A module-level function.
    Function,
    /// A module-level attribute (global).
    Attribute,
    /// A function declared in a class body.
    Method,
    /// An attribute declared in a class body.
    Property,
}

impl SymbolKind {
    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::Attribute => "attribute",
            SymbolKind::Method => "method",
            SymbolKind::Property => "property",
        }
    }

    /// Number of trailing path segments that form the leaf of the
    /// navigation path.
    ///
    /// The remaining leading segments become the "directory" part.
    pub fn leaf_segments(&self) -> usize {
        match self {
            SymbolKind::Module => 1,
            SymbolKind::Class => 2,
            SymbolKind::Function | SymbolKind::Attribute => 2,
            SymbolKind::Method | SymbolKind::Property => 3,
        }
    }

    /// Whether the symbol is declared inside a class body.
    pub fn is_member(&self) -> bool {
        matches!(self, SymbolKind::Method | SymbolKind::Property)
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Symbol Reference
// ============================================================================

/// One entry of the symbol table: kind plus navigation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRef {
    /// Kind of the symbol.
    pub kind: SymbolKind,
    /// Navigation path used by the renderer for the symbol's page/anchor.
    pub navigation_path: String,
}

impl SymbolRef {
    /// Create a symbol reference, deriving the navigation path from the
    /// root-relative canonical path.
    pub fn new(kind: SymbolKind, relative_path: &str) -> Self {
        SymbolRef {
            kind,
            navigation_path: navigation_path(kind, relative_path),
        }
    }
}

/// Derive the navigation path of a symbol.
///
/// The last [`SymbolKind::leaf_segments`] segments are joined with `.` and
/// form the leaf; the leading segments are joined with `/` and form the
/// directory. Directory and leaf are separated by `/`:
///
/// | Kind | Canonical path | Navigation path |
/// |------|----------------|-----------------|
/// | module | `sub.mod` | `sub/mod` |
/// | class | `sub.mod.Klass` | `sub/mod.Klass` |
/// | method | `sub.mod.Klass.run` | `sub/mod.Klass.run` |
///
/// When the path has no more segments than the leaf needs, the directory
/// part is omitted.
pub fn navigation_path(kind: SymbolKind, canonical_path: &str) -> String {
    let segments: Vec<&str> = canonical_path.split('.').collect();
    let split = segments.len().saturating_sub(kind.leaf_segments());
    let (dir, leaf) = segments.split_at(split);
    if dir.is_empty() {
        leaf.join(".")
    } else {
        format!("{}/{}", dir.join("/"), leaf.join("."))
    }
}

// ============================================================================
// Tests
// ============================================================================
