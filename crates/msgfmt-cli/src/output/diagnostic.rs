//! Miette diagnostic wrapper for catalog and template errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![expect(unused_assignments)]

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use msgfmt::parser::ParseError;
use msgfmt::SyntaxError;
use thiserror::Error;

/// A miette-compatible diagnostic for catalog syntax errors.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(msgfmt::syntax))]
pub struct CatalogDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    message: String,

    #[help]
    help: Option<String>,
}

impl CatalogDiagnostic {
    /// Create a diagnostic from a catalog ParseError with source context.
    pub fn from_parse_error(path: &Path, content: &str, err: &ParseError) -> Self {
        let (line, column, message, help) = match err {
            ParseError::Syntax {
                line,
                column,
                message,
            } => (*line, *column, format!("syntax error: {message}"), None),
            ParseError::MissingSeparator { key, line } => (
                *line,
                key.chars().count() + 1,
                format!("missing separator after '{key}'"),
                Some("entries look like `code = template` or `code: template`".to_string()),
            ),
        };

        Self::at(path, content, line, column, message, help)
    }

    /// Create a diagnostic for an expression placeholder that failed to parse.
    ///
    /// `line` is the catalog line of the entry holding the template.
    pub fn from_syntax_error(
        path: &Path,
        content: &str,
        line: usize,
        code: &str,
        err: &SyntaxError,
    ) -> Self {
        // Point at the expression inside the entry's line when it is there.
        let line_text = content.lines().nth(line.saturating_sub(1)).unwrap_or("");
        let column = line_text
            .find(&err.expression)
            .map_or(1, |offset| line_text[..offset].chars().count() + err.column);

        Self::at(
            path,
            content,
            line,
            column,
            format!("invalid expression in '{code}': {}", err.message),
            Some(format!("expression: {}", err.expression)),
        )
    }

    fn at(
        path: &Path,
        content: &str,
        line: usize,
        column: usize,
        message: String,
        help: Option<String>,
    ) -> Self {
        // Convert line:column to byte offset.
        // Sum of (line_length + 1) for lines before error line, plus column.
        let line_start = content
            .lines()
            .take(line.saturating_sub(1))
            .map(|l| l.len() + 1)
            .sum::<usize>();
        let line_text = content.get(line_start..).unwrap_or("");
        let column_bytes = line_text
            .char_indices()
            .nth(column.saturating_sub(1))
            .map_or(0, |(i, _)| i);

        // Clamp offset to content length to avoid miette panic on out-of-bounds
        let offset = (line_start + column_bytes).min(content.len());

        CatalogDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: (offset, 1).into(),
            message,
            help,
        }
    }
}
