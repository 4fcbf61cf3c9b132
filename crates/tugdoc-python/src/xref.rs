//! Cross-reference resolution.
//!
//! Two kinds of references are resolved to navigation links:
//!
//! - **inferred references**: canonical paths of names used in type-bearing
//!   fields, resolved by [`Project::resolve_path`];
//! - **cross-link tags** written in docstrings, ``:func:`pkg.mod.run` `` or
//!   ``:class:`custom label <pkg.mod.Klass>` ``, rendered by
//!   [`Project::replace_links`].
//!
//! # Resolution order
//!
//! 1. Internal path: relative symbol table lookup, then the alias map
//!    (chains followed at most `max_depth` hops). Failure records an
//!    internal unresolved diagnostic.
//! 2. External path: the external link table, used verbatim. Failure
//!    records an external unresolved diagnostic.
//!
//! Cross-link tags additionally accept paths relative to the root and path
//! suffixes. A suffix is never resolved automatically: every symbol it could
//! designate is recorded as a candidate and the label is rendered unlinked.
//!
//! Links have the form `[label](@nav{base}/{navigation_path})`.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;
use tugdoc_core::diagnostics::Diagnostics;

use crate::project::Project;
use crate::symbols::{ends_with_segments, is_internal, relative_path};

static CROSS_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":(\w+):`([^`]+)`").unwrap());

static CUSTOM_TARGET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^>]+)>").unwrap());

// ============================================================================
// Cross-Link Tags
// ============================================================================

/// Supported cross-link tag kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossLinkTag {
    Mod,
    Class,
    Func,
    Attr,
    Meth,
    Glob,
}

impl CrossLinkTag {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "mod" => Some(CrossLinkTag::Mod),
            "class" => Some(CrossLinkTag::Class),
            "func" => Some(CrossLinkTag::Func),
            "attr" => Some(CrossLinkTag::Attr),
            "meth" => Some(CrossLinkTag::Meth),
            "glob" => Some(CrossLinkTag::Glob),
            _ => None,
        }
    }

    /// Tags designating a class member.
    pub fn is_member(&self) -> bool {
        matches!(self, CrossLinkTag::Attr | CrossLinkTag::Meth)
    }
}

/// A parsed tag body: display label and target path.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CrossLinkTarget<'a> {
    label: &'a str,
    path: &'a str,
}

impl<'a> CrossLinkTarget<'a> {
    /// Parse `path` or `custom label <path>`.
    fn parse(content: &'a str) -> Self {
        let (label, path) = match CUSTOM_TARGET.captures(content) {
            Some(caps) => {
                let whole = caps.get(0).map_or(0, |m| m.start());
                let path = caps.get(1).map_or(content, |m| m.as_str()).trim();
                (content[..whole].trim(), path)
            }
            None => ("", content.trim()),
        };
        let label = if label.is_empty() {
            path.rsplit('.').next().unwrap_or(path)
        } else {
            label
        };
        CrossLinkTarget { label, path }
    }
}

// ============================================================================
// Resolution
// ============================================================================

impl Project<'_> {
    /// Whether `path` lies inside the project namespace.
    pub fn is_internal(&self, path: &str) -> bool {
        is_internal(self.root_name(), path)
    }

    /// Navigation path of an internal canonical path, following aliases.
    pub fn navigation_of<'s>(&'s self, path: &'s str) -> Option<&'s str> {
        let root = self.root_name();
        let mut current = path;
        for _ in 0..=self.max_depth {
            if let Some(symbol) = self.symbols.get(relative_path(root, current)) {
                return Some(&symbol.navigation_path);
            }
            current = self.aliases.get(current).map(String::as_str)?;
        }
        debug!("alias chain from {} exceeds {} hops", path, self.max_depth);
        None
    }

    /// Link target for a navigation path.
    pub fn nav_link(&self, navigation_path: &str) -> String {
        format!("@nav{}/{}", self.base_nav, navigation_path)
    }

    /// Resolve an inferred reference to a link target.
    ///
    /// Records an internal or external unresolved diagnostic on failure.
    pub fn resolve_path(&self, path: &str, diagnostics: &mut Diagnostics) -> Option<String> {
        if self.is_internal(path) {
            match self.navigation_of(path) {
                Some(nav) => Some(self.nav_link(nav)),
                None => {
                    diagnostics.add_internal_cross_ref_error(path);
                    None
                }
            }
        } else if let Some(url) = self.external_links.get(path) {
            Some(url.clone())
        } else {
            diagnostics.add_external_cross_ref_error(path);
            None
        }
    }

    /// Render every cross-link tag of `text` as a link or a plain label.
    ///
    /// `parent` is the canonical path of the documented symbol, used to key
    /// diagnostics.
    pub fn replace_links(&self, text: &str, parent: &str, diagnostics: &mut Diagnostics) -> String {
        CROSS_LINK
            .replace_all(text, |caps: &Captures| {
                self.render_cross_link(caps, parent, diagnostics)
            })
            .into_owned()
    }

    fn render_cross_link(
        &self,
        caps: &Captures,
        parent: &str,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let whole = &caps[0];
        let target = CrossLinkTarget::parse(&caps[2]);
        let label = target.label;

        let Some(tag) = CrossLinkTag::parse(&caps[1]) else {
            diagnostics.add_unknown_tag(parent, &caps[1]);
            return label.to_string();
        };

        let path = target.path;
        if path.is_empty() {
            diagnostics.add_unresolved_link(parent, whole, Vec::new());
            return label.to_string();
        }
        if self.is_internal(path) {
            return match self.navigation_of(path) {
                Some(nav) => format!("[{label}]({})", self.nav_link(nav)),
                None => {
                    diagnostics.add_internal_cross_ref_error(path);
                    label.to_string()
                }
            };
        }

        let rooted = format!("{}.{}", self.root_name(), path);
        if let Some(nav) = self.navigation_of(&rooted) {
            return format!("[{label}]({})", self.nav_link(nav));
        }
        if let Some(url) = self.external_links.get(path) {
            return format!("[{label}]({url})");
        }

        let candidates = self.shorthand_candidates(tag, path);
        if candidates.is_empty() {
            diagnostics.add_external_cross_ref_error(path);
        } else {
            debug!("{}: {} has {} candidates", parent, whole, candidates.len());
            diagnostics.add_unresolved_link(parent, whole, candidates);
        }
        label.to_string()
    }

    /// Symbols a path suffix could designate, as relative canonical paths.
    ///
    /// Non-member tags match symbols ending with the suffix. Member tags
    /// match members of every class whose path ends with the suffix's
    /// parent, or members named like the suffix when it has no parent.
    pub fn shorthand_candidates(&self, tag: CrossLinkTag, suffix: &str) -> Vec<String> {
        let suffix = relative_path(self.root_name(), suffix.trim());
        if suffix.is_empty() {
            return Vec::new();
        }
        if !tag.is_member() {
            return self
                .symbols
                .keys()
                .filter(|key| ends_with_segments(key, suffix))
                .cloned()
                .collect();
        }

        let (suffix_parent, suffix_leaf) = suffix.rsplit_once('.').unwrap_or(("", suffix));
        self.symbols
            .iter()
            .filter(|(_, symbol)| symbol.kind.is_member())
            .filter(|(key, _)| {
                let (parent, leaf) = key.rsplit_once('.').unwrap_or(("", key.as_str()));
                if suffix_parent.is_empty() {
                    leaf == suffix_leaf
                } else {
                    ends_with_segments(parent, suffix_parent)
                }
            })
            .map(|(key, _)| key.clone())
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
