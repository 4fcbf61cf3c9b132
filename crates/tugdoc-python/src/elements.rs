//! Documented elements of a module.
//!
//! A package page gathers what its plain-file children declare: the
//! documented classes, functions and attributes of each file, in file order
//! and then declaration order. Documented sub-packages become child modules
//! with their own page.

use crate::ast::{AstNode, AstTree};

/// What a module documents.
#[derive(Debug, Default)]
pub struct ModuleElements<'a> {
    /// Documented sub-packages.
    pub modules: Vec<&'a AstNode>,
    /// Plain (non-package) module files.
    pub files: Vec<&'a AstNode>,
    pub classes: Vec<&'a AstNode>,
    pub functions: Vec<&'a AstNode>,
    pub attributes: Vec<&'a AstNode>,
}

/// Split the children of `module` into its documented elements.
pub fn extract_module<'a>(tree: &'a AstTree, module: &'a AstNode) -> ModuleElements<'a> {
    let mut elements = ModuleElements::default();
    for child in tree.children(module).filter(|c| c.is_module()) {
        if child.is_package() {
            if child.has_docstring() {
                elements.modules.push(child);
            }
        } else {
            elements.files.push(child);
        }
    }

    for file in elements.files.clone() {
        for member in tree.children(file).filter(|m| m.has_docstring()) {
            if member.is_class() {
                elements.classes.push(member);
            } else if member.is_function() {
                elements.functions.push(member);
            } else if member.is_attribute() {
                elements.attributes.push(member);
            }
        }
    }
    elements
}

/// Whether a module has no documented sub-package.
pub fn is_leaf_module(tree: &AstTree, module: &AstNode) -> bool {
    !tree
        .children(module)
        .any(|child| child.is_package() && child.has_docstring())
}

/// Own documented methods of a class, in declaration order.
pub fn class_methods<'a>(tree: &'a AstTree, class: &'a AstNode) -> Vec<&'a AstNode> {
    tree.children(class)
        .filter(|m| m.is_function() && m.has_docstring() && !m.is_inherited())
        .collect()
}

/// Own documented attributes of a class, in declaration order.
pub fn class_attributes<'a>(tree: &'a AstTree, class: &'a AstNode) -> Vec<&'a AstNode> {
    tree.children(class)
        .filter(|m| m.is_attribute() && m.has_docstring() && !m.is_inherited())
        .collect()
}
