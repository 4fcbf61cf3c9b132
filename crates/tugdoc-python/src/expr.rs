//! Expression model of the ingestion snapshot and its typed visitor.
//!
//! Type-bearing fields of the snapshot (class bases and decorators,
//! parameter and return annotations, attribute annotations and values) are
//! stored as [`Expr`] trees. The static-analysis collaborator has already
//! resolved every name: an [`ExprName`] carries both the source spelling and
//! the canonical path it refers to.
//!
//! Reference collection walks these trees with an [`ExprVisitor`]; the walk
//! only descends into expression children, so nothing outside the field
//! being scanned is ever reached.

use serde::{Deserialize, Serialize};

// ============================================================================
// Expressions
// ============================================================================

/// A resolved name inside an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExprName {
    /// Name as written in the source.
    pub name: String,
    /// Canonical path the name resolves to.
    pub path: String,
}

/// An expression of a type-bearing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// `name`
    Name(ExprName),
    /// `a.b.c`, one element per segment.
    Attribute { values: Vec<Expr> },
    /// `left[slice]`
    Subscript { left: Box<Expr>, slice: Box<Expr> },
    /// `(a, b)`
    Tuple { elements: Vec<Expr> },
    /// `[a, b]`
    List { elements: Vec<Expr> },
    /// `left | right`
    Binop {
        left: Box<Expr>,
        operator: String,
        right: Box<Expr>,
    },
    /// `function(arguments)`
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
    /// `name=value` inside a call.
    Keyword { name: String, value: Box<Expr> },
    /// A literal scalar; never carries a reference.
    Constant { value: String },
}

impl Expr {
    /// Convenience constructor for a resolved name.
    pub fn name(name: impl Into<String>, path: impl Into<String>) -> Self {
        Expr::Name(ExprName {
            name: name.into(),
            path: path.into(),
        })
    }
}

// ============================================================================
// Visitor
// ============================================================================

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    #[default]
    Continue,
    /// Skip children, continue with siblings.
    SkipChildren,
    /// Stop traversal entirely.
    Stop,
}

/// Visitor over expression trees.
pub trait ExprVisitor {
    /// Called for every expression before its children.
    fn visit_expr(&mut self, _expr: &Expr) -> VisitResult {
        VisitResult::Continue
    }

    /// Called for every resolved name.
    fn visit_name(&mut self, _name: &ExprName) -> VisitResult {
        VisitResult::Continue
    }
}

/// Walk an expression depth-first.
///
/// Returns [`VisitResult::Stop`] if the visitor stopped the walk.
pub fn walk_expr<V: ExprVisitor + ?Sized>(visitor: &mut V, expr: &Expr) -> VisitResult {
    match visitor.visit_expr(expr) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => return VisitResult::Continue,
        VisitResult::Continue => {}
    }

    let children: Vec<&Expr> = match expr {
        Expr::Name(name) => return visitor.visit_name(name),
        Expr::Attribute { values } => values.iter().collect(),
        Expr::Subscript { left, slice } => vec![left.as_ref(), slice.as_ref()],
        Expr::Tuple { elements } | Expr::List { elements } => elements.iter().collect(),
        Expr::Binop { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        Expr::Call {
            function,
            arguments,
        } => std::iter::once(function.as_ref())
            .chain(arguments.iter())
            .collect(),
        Expr::Keyword { value, .. } => vec![value.as_ref()],
        Expr::Constant { .. } => Vec::new(),
    };

    for child in children {
        if walk_expr(visitor, child) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Collects every [`ExprName`] in walk order.
#[derive(Debug, Default)]
pub struct NameCollector {
    names: Vec<ExprName>,
}

impl NameCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_names(self) -> Vec<ExprName> {
        self.names
    }
}

impl ExprVisitor for NameCollector {
    fn visit_name(&mut self, name: &ExprName) -> VisitResult {
        self.names.push(name.clone());
        VisitResult::Continue
    }
}

/// Collect the names of several expressions, in order.
pub fn collect_names<'a>(exprs: impl IntoIterator<Item = &'a Expr>) -> Vec<ExprName> {
    let mut collector = NameCollector::new();
    for expr in exprs {
        walk_expr(&mut collector, expr);
    }
    collector.into_names()
}

// ============================================================================
// Tests
// ============================================================================
