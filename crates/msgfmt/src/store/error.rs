//! Error types for template stores.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that occur while loading a catalog bundle.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a bundle file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parse error with file location context.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Attempted to reload a bundle that was loaded from a string.
    #[error("cannot reload '{language}': was loaded from string, not file")]
    NoPathForReload { language: String },
}

/// Errors raised when looking up a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// No template exists for the code in the language or its fallbacks.
    #[error("no template '{code}' for language '{language}'")]
    NotFound { code: String, language: String },
}
