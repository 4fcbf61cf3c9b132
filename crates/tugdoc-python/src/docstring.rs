//! Google-style docstring parsing.
//!
//! A docstring is split into ordered sections. A section starts with a
//! `Title:` line at column zero followed by an indented block:
//!
//! ```text
//! Summary line.
//!
//! Args:
//!     path (str): File to read.
//!     strict: Fail on unknown keys.
//!
//! Returns:
//!     dict: The parsed content.
//!
//! Warning:
//!     Not thread safe.
//! ```
//!
//! | Title | Section |
//! |-------|---------|
//! | `Args`, `Arguments`, `Params`, `Parameters` | [`DocstringSection::Parameters`] |
//! | `Return`, `Returns` | [`DocstringSection::Returns`] |
//! | anything else | [`DocstringSection::Admonition`] |
//!
//! Lines outside sections are free text. Fenced code blocks are kept
//! verbatim: a `Title:` line inside a fence does not open a section.
//!
//! A malformed section is dropped and reported as a [`DocstringError`];
//! the rest of the docstring is still returned.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static SECTION_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9 _-]*):\s*$").unwrap());

static PARAMETER_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*{0,2}[A-Za-z_][A-Za-z0-9_]*)\s*(?:\(([^)]*)\))?\s*:(.*)$").unwrap()
});

static RETURN_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w.|]+(?:\[[^\]]*\])?)\s*:(.*)$").unwrap());

// ============================================================================
// Types
// ============================================================================

/// One documented parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParameter {
    pub name: String,
    pub annotation: Option<String>,
    pub description: String,
}

/// The documented return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocReturns {
    pub annotation: Option<String>,
    pub description: String,
}

/// A parsed docstring section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocstringSection {
    /// Free text.
    Text(String),
    /// Titled callout; `tag` is the slug of the title.
    Admonition {
        title: String,
        tag: Option<String>,
        body: String,
    },
    Parameters(Vec<DocParameter>),
    Returns(DocReturns),
}

/// A section that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocstringError {
    #[error("malformed entry in {section} section: '{line}'")]
    MalformedParameter { section: String, line: String },

    #[error("{section} section has no description")]
    EmptySection { section: String },
}

/// Sections in docstring order plus the sections that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocstring {
    pub sections: Vec<DocstringSection>,
    pub errors: Vec<DocstringError>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Normalize docstring text.
///
/// Leading and trailing blank lines are removed and the indentation common
/// to every non-blank line is stripped, so already-cleaned text is returned
/// unchanged.
pub fn normalize(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    dedent(&lines).join("\n")
}

/// Parse a Google-style docstring.
pub fn parse_google(text: &str) -> ParsedDocstring {
    let cleaned = normalize(text);
    let lines: Vec<&str> = cleaned.lines().collect();
    let mut parsed = ParsedDocstring::default();
    let mut text_block: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_fence(line) {
            in_fence = !in_fence;
        } else if !in_fence {
            if let Some(title) = section_title(&lines, i) {
                flush_text(&mut text_block, &mut parsed.sections);
                let end = block_end(&lines, i + 1);
                let block = dedent(&lines[i + 1..end]);
                match parse_section(title, &block) {
                    Ok(section) => parsed.sections.push(section),
                    Err(err) => parsed.errors.push(err),
                }
                i = end;
                continue;
            }
        }
        text_block.push(line);
        i += 1;
    }
    flush_text(&mut text_block, &mut parsed.sections);
    parsed
}

fn parse_section(title: &str, block: &[String]) -> Result<DocstringSection, DocstringError> {
    match title.to_lowercase().as_str() {
        "args" | "arguments" | "params" | "parameters" => {
            parse_parameters(title, block).map(DocstringSection::Parameters)
        }
        "return" | "returns" => parse_returns(title, block).map(DocstringSection::Returns),
        _ => Ok(DocstringSection::Admonition {
            title: title.to_string(),
            tag: slug(title),
            body: block.join("\n"),
        }),
    }
}

fn parse_parameters(title: &str, block: &[String]) -> Result<Vec<DocParameter>, DocstringError> {
    let mut items: Vec<(DocParameter, Vec<&str>)> = Vec::new();
    for line in block {
        if line.trim().is_empty() || line.starts_with(char::is_whitespace) {
            if let Some((_, continuation)) = items.last_mut() {
                continuation.push(line);
            }
            continue;
        }
        let caps = PARAMETER_ITEM
            .captures(line)
            .ok_or_else(|| DocstringError::MalformedParameter {
                section: title.to_string(),
                line: line.clone(),
            })?;
        items.push((
            DocParameter {
                name: caps[1].to_string(),
                annotation: caps.get(2).map(|m| m.as_str().trim().to_string()),
                description: caps[3].trim().to_string(),
            },
            Vec::new(),
        ));
    }

    Ok(items
        .into_iter()
        .map(|(mut parameter, continuation)| {
            parameter.description = join_description(&parameter.description, &continuation);
            parameter
        })
        .collect())
}

fn parse_returns(title: &str, block: &[String]) -> Result<DocReturns, DocstringError> {
    let (first, rest) = block.split_first().map_or(("", &[][..]), |(f, r)| (f.as_str(), r));
    let (annotation, first) = match RETURN_TYPE.captures(first) {
        Some(caps) => (
            Some(caps[1].to_string()),
            caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
        ),
        None => (None, first.trim().to_string()),
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
    let description = join_description(&first, &rest);
    if description.is_empty() {
        return Err(DocstringError::EmptySection {
            section: title.to_string(),
        });
    }
    Ok(DocReturns {
        annotation,
        description,
    })
}

// ============================================================================
// Line Helpers
// ============================================================================

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    if indentation(line) >= indent {
        line.get(indent..).unwrap_or_else(|| line.trim_start())
    } else {
        line.trim_start()
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Title of the section opened at `i`, if any: a `Title:` line whose next
/// line is indented.
fn section_title<'a>(lines: &[&'a str], i: usize) -> Option<&'a str> {
    let caps = SECTION_TITLE.captures(lines[i])?;
    let next = lines.get(i + 1)?;
    if next.trim().is_empty() || !next.starts_with(char::is_whitespace) {
        return None;
    }
    caps.get(1).map(|m| m.as_str().trim())
}

/// Index one past the indented block starting at `start`; trailing blank
/// lines are left out of the block.
fn block_end(lines: &[&str], start: usize) -> usize {
    let mut end = start;
    let mut last_content = start;
    while end < lines.len() {
        let line = lines[end];
        if line.trim().is_empty() {
            end += 1;
            continue;
        }
        if !line.starts_with(char::is_whitespace) {
            break;
        }
        end += 1;
        last_content = end;
    }
    last_content
}

fn dedent(lines: &[&str]) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indentation(line))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| strip_indent(line, indent).to_string())
        .collect()
}

fn join_description(first: &str, continuation: &[&str]) -> String {
    let mut parts = vec![first.to_string()];
    parts.extend(dedent(continuation));
    let joined = parts.join("\n");
    joined.trim().to_string()
}

fn flush_text(block: &mut Vec<&str>, sections: &mut Vec<DocstringSection>) {
    let text = block.join("\n");
    block.clear();
    let text = text.trim_matches('\n');
    if !text.trim().is_empty() {
        sections.push(DocstringSection::Text(text.to_string()));
    }
}

fn slug(title: &str) -> Option<String> {
    let slug = title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    (!slug.is_empty()).then_some(slug)
}

// ============================================================================
// Tests
// ============================================================================
