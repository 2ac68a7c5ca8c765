//! Parse error types for catalog files.

use thiserror::Error;

/// An error that occurred while parsing a catalog file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// A key was defined with an empty template body and no separator.
    #[error("missing separator after key '{key}' at line {line}")]
    MissingSeparator { key: String, line: usize },
}
