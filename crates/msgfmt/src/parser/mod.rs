//! Template and catalog parsers.
//!
//! This module scans message templates into segments (literal text, escapes,
//! plain placeholders, expression placeholders) and parses catalog files
//! containing `code = template` entries.

pub mod ast;
mod catalog;
pub mod error;
mod template;

pub use ast::*;
pub use catalog::parse_catalog;
pub use error::ParseError;
pub use template::{contains_placeholder, parse_template, unescape};
