//! Run-scoped diagnostics reporter.
//!
//! [`Diagnostics`] accumulates every degraded-but-recoverable issue found
//! during a documentation run. It is an explicit context object: callers
//! pass `&mut Diagnostics` down the traversal and may [`merge`] partial
//! reporters back into the run reporter. Nothing here ever fails or aborts.
//!
//! Six independent, append-only bins are kept:
//!
//! | Bin | Key |
//! |-----|-----|
//! | errors | symbol path → descriptions |
//! | internal unresolved | canonical path inside the project |
//! | external unresolved | canonical path outside the project |
//! | missing docstrings | symbol path |
//! | unknown tags | `[parent] => `tag` unknown` |
//! | unresolved shorthands | `parent=>link` → candidate list |
//!
//! All bins use ordered collections so the rendered summary is stable.
//!
//! [`merge`]: Diagnostics::merge

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

// ============================================================================
// Diagnostics
// ============================================================================

/// Categorized issues for one documentation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    errors: BTreeMap<String, BTreeSet<String>>,
    internal_cross_ref_errors: BTreeSet<String>,
    external_cross_ref_errors: BTreeSet<String>,
    no_docstrings: BTreeSet<String>,
    unknown_tags: BTreeSet<String>,
    unresolved_links: BTreeMap<String, Vec<String>>,
}

/// Number of entries per bin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticCounts {
    pub errors: usize,
    pub internal_cross_ref_errors: usize,
    pub external_cross_ref_errors: usize,
    pub no_docstrings: usize,
    pub unknown_tags: usize,
    pub unresolved_links: usize,
}

impl Diagnostics {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a free-form error against a symbol.
    pub fn add_error(&mut self, symbol_path: impl Into<String>, description: impl Into<String>) {
        self.errors
            .entry(symbol_path.into())
            .or_default()
            .insert(description.into());
    }

    /// Record an internal reference that could not be resolved.
    pub fn add_internal_cross_ref_error(&mut self, path: impl Into<String>) {
        self.internal_cross_ref_errors.insert(path.into());
    }

    /// Record an external reference missing from the link table.
    pub fn add_external_cross_ref_error(&mut self, path: impl Into<String>) {
        self.external_cross_ref_errors.insert(path.into());
    }

    /// Record a symbol that should carry a docstring but does not.
    pub fn add_no_docstring(&mut self, symbol_path: impl Into<String>) {
        self.no_docstrings.insert(symbol_path.into());
    }

    /// Record a cross-link tag kind that is not supported.
    pub fn add_unknown_tag(&mut self, parent: &str, tag: &str) {
        self.unknown_tags.insert(format!("[{parent}] => `{tag}` unknown"));
    }

    /// Record a cross-link whose target could not be determined, with the
    /// candidates found by suffix search.
    pub fn add_unresolved_link(&mut self, parent: &str, link: &str, candidates: Vec<String>) {
        self.unresolved_links
            .insert(format!("{parent}=>{link}"), candidates);
    }

    /// Fold another reporter into this one.
    pub fn merge(&mut self, other: Diagnostics) {
        for (path, descriptions) in other.errors {
            self.errors.entry(path).or_default().extend(descriptions);
        }
        self.internal_cross_ref_errors
            .extend(other.internal_cross_ref_errors);
        self.external_cross_ref_errors
            .extend(other.external_cross_ref_errors);
        self.no_docstrings.extend(other.no_docstrings);
        self.unknown_tags.extend(other.unknown_tags);
        self.unresolved_links.extend(other.unresolved_links);
    }

    /// Take every entry out of the reporter, leaving it empty.
    pub fn drain(&mut self) -> Diagnostics {
        std::mem::take(self)
    }

    /// Whether no issue was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts() == DiagnosticCounts::default()
    }

    /// Entry count per bin.
    pub fn counts(&self) -> DiagnosticCounts {
        DiagnosticCounts {
            errors: self.errors.len(),
            internal_cross_ref_errors: self.internal_cross_ref_errors.len(),
            external_cross_ref_errors: self.external_cross_ref_errors.len(),
            no_docstrings: self.no_docstrings.len(),
            unknown_tags: self.unknown_tags.len(),
            unresolved_links: self.unresolved_links.len(),
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.errors
    }

    pub fn internal_cross_ref_errors(&self) -> &BTreeSet<String> {
        &self.internal_cross_ref_errors
    }

    pub fn external_cross_ref_errors(&self) -> &BTreeSet<String> {
        &self.external_cross_ref_errors
    }

    pub fn no_docstrings(&self) -> &BTreeSet<String> {
        &self.no_docstrings
    }

    pub fn unknown_tags(&self) -> &BTreeSet<String> {
        &self.unknown_tags
    }

    pub fn unresolved_links(&self) -> &BTreeMap<String, Vec<String>> {
        &self.unresolved_links
    }

    /// Render the labelled text summary (counts + contents).
    pub fn render_text(&self, writer: &mut impl Write) -> io::Result<()> {
        write_set(
            writer,
            "Internal cross links errors",
            &self.internal_cross_ref_errors,
        )?;
        write_set(
            writer,
            "External cross links errors",
            &self.external_cross_ref_errors,
        )?;
        write_set(writer, "No docstring errors", &self.no_docstrings)?;
        write_set(writer, "Cross-link tag unknown", &self.unknown_tags)?;

        writeln!(
            writer,
            "Cross-link unresolved ({}):",
            self.unresolved_links.len()
        )?;
        for (link, candidates) in &self.unresolved_links {
            writeln!(writer, "  - {link} candidates: [{}]", candidates.join(", "))?;
        }

        writeln!(writer, "Errors ({}):", self.errors.len())?;
        for (path, descriptions) in &self.errors {
            for description in descriptions {
                writeln!(writer, "  - {path}: {description}")?;
            }
        }
        Ok(())
    }
}

fn write_set(writer: &mut impl Write, label: &str, entries: &BTreeSet<String>) -> io::Result<()> {
    writeln!(writer, "{label} ({}):", entries.len())?;
    for entry in entries {
        writeln!(writer, "  - {entry}")?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn render(diagnostics: &Diagnostics) -> String {
        let mut out = Vec::new();
        diagnostics.render_text(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn new_reporter_is_empty() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert_eq!(diagnostics.counts(), DiagnosticCounts::default());
    }

    #[test]
    fn bins_are_independent() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_internal_cross_ref_error("pkg.missing");
        diagnostics.add_external_cross_ref_error("numpy.ndarray");
        diagnostics.add_no_docstring("pkg.mod.foo");

        let counts = diagnostics.counts();
        assert_eq!(counts.internal_cross_ref_errors, 1);
        assert_eq!(counts.external_cross_ref_errors, 1);
        assert_eq!(counts.no_docstrings, 1);
        assert_eq!(counts.errors, 0);
        assert_eq!(counts.unknown_tags, 0);
        assert_eq!(counts.unresolved_links, 0);
    }

    #[test]
    fn repeated_entries_are_deduplicated() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_internal_cross_ref_error("pkg.missing");
        diagnostics.add_internal_cross_ref_error("pkg.missing");
        diagnostics.add_error("pkg.mod.foo", "bad returns");
        diagnostics.add_error("pkg.mod.foo", "bad returns");
        assert_eq!(diagnostics.internal_cross_ref_errors().len(), 1);
        assert_eq!(diagnostics.errors()["pkg.mod.foo"].len(), 1);
    }

    #[test]
    fn unknown_tag_format() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_unknown_tag("pkg.mod.foo", "data");
        assert!(diagnostics
            .unknown_tags()
            .contains("[pkg.mod.foo] => `data` unknown"));
    }

    #[test]
    fn merge_combines_bins() {
        let mut run = Diagnostics::new();
        run.add_error("pkg.a", "first");
        let mut partial = Diagnostics::new();
        partial.add_error("pkg.a", "second");
        partial.add_unresolved_link("pkg.b", ":class:`Thing`", vec!["a.Thing".to_string()]);

        run.merge(partial);
        assert_eq!(run.errors()["pkg.a"].len(), 2);
        assert_eq!(
            run.unresolved_links()["pkg.b=>:class:`Thing`"],
            vec!["a.Thing".to_string()]
        );
    }

    #[test]
    fn drain_leaves_reporter_empty() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_no_docstring("pkg.x");
        let drained = diagnostics.drain();
        assert!(diagnostics.is_empty());
        assert_eq!(drained.no_docstrings().len(), 1);
    }

    #[test]
    fn render_text_lists_counts_and_entries() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_internal_cross_ref_error("pkg.missing");
        diagnostics.add_unresolved_link("pkg.mod", ":func:`run`", vec![]);

        let text = render(&diagnostics);
        assert!(text.contains("Internal cross links errors (1):\n  - pkg.missing\n"));
        assert!(text.contains("External cross links errors (0):\n"));
        assert!(text.contains("Cross-link unresolved (1):\n  - pkg.mod=>:func:`run` candidates: []\n"));
        assert!(text.ends_with("Errors (0):\n"));
    }
}
