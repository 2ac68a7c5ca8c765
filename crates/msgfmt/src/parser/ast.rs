//! Public AST types for templates and catalog entries.
//!
//! These types are public so tools (the CLI's `check` command, linters) can
//! inspect templates without rendering them.

use super::template::starts_with_reference;

/// A scanned template: the ordered segments of its text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedTemplate {
    pub segments: Vec<Segment>,
}

impl ParsedTemplate {
    /// Returns true if any segment is a placeholder of either kind.
    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(_) | Segment::Expression(_)))
    }

    /// Names referenced by plain placeholders, in order of appearance.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Expression texts, in order of appearance.
    pub fn expressions(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Expression(body) => Some(body.as_str()),
            _ => None,
        })
    }
}

/// A segment within a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, including braces that did not form a placeholder.
    Literal(String),
    /// An escaped character: `\{`, `\}` or `\\`.
    Escape(char),
    /// A plain placeholder: `{name}`.
    Placeholder(String),
    /// An expression placeholder: `{#expression}`. Holds the expression
    /// text: `#` is kept when it begins a `#name` reference and dropped
    /// otherwise.
    Expression(String),
}

impl Segment {
    /// Writes the segment back in template syntax.
    pub fn write_source(&self, out: &mut String) {
        match self {
            Segment::Literal(text) => out.push_str(text),
            Segment::Escape(c) => {
                out.push('\\');
                out.push(*c);
            }
            Segment::Placeholder(name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            Segment::Expression(body) => {
                out.push('{');
                if !starts_with_reference(body) {
                    out.push('#');
                }
                out.push_str(body);
                out.push('}');
            }
        }
    }
}

/// One `code = template` entry from a catalog file.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Message code.
    pub code: String,
    /// Raw template text, with continuation lines joined.
    pub text: String,
    /// 1-based line where the entry starts.
    pub line: usize,
}
