//! Catalog file parser.
//!
//! Parses properties-style message catalogs:
//!
//! ```text
//! # comment
//! ! also a comment
//! greeting = Hello, {name}!
//! range: {min} to {max}
//! long = first part \
//!        second part
//! ```
//!
//! Values are raw template text: template escapes such as `\{` are kept as
//! written and interpreted later by the template scanner.

use super::ast::CatalogEntry;
use super::error::ParseError;
use winnow::combinator::{alt, opt, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

/// Parse a catalog file into entries, in file order.
///
/// Duplicate codes are returned as-is; the catalog keeps the last one.
///
/// # Example
///
/// ```
/// use msgfmt::parser::parse_catalog;
///
/// let entries = parse_catalog("# greetings\nhello = Hello, {name}!\n").unwrap();
/// assert_eq!(entries[0].code, "hello");
/// assert_eq!(entries[0].text, "Hello, {name}!");
/// ```
pub fn parse_catalog(input: &str) -> Result<Vec<CatalogEntry>, ParseError> {
    let mut entries = Vec::new();
    let mut remaining = input;

    loop {
        skip_blank_and_comments(&mut remaining);
        if remaining.is_empty() {
            return Ok(entries);
        }
        let (line, column) = calculate_position(input, remaining);
        let key = match catalog_key.parse_next(&mut remaining) {
            Ok(key) => key.to_string(),
            Err(_) => {
                return Err(ParseError::Syntax {
                    line,
                    column,
                    message: format!(
                        "unexpected character: '{}'",
                        remaining.chars().next().unwrap_or('?')
                    ),
                });
            }
        };
        if separator.parse_next(&mut remaining).is_err() {
            return Err(ParseError::MissingSeparator { key, line });
        }
        let text = value(&mut remaining);
        entries.push(CatalogEntry {
            code: key,
            text,
            line,
        });
    }
}

/// Calculate line and column from original input and remaining input.
fn calculate_position(original: &str, remaining: &str) -> (usize, usize) {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let last_newline = consumed_str.rfind('\n');
    let column = match last_newline {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, column)
}

/// Skip whitespace, blank lines, and `#`/`!` comment lines.
fn skip_blank_and_comments(input: &mut &str) {
    let _: ModalResult<Vec<()>> =
        repeat(0.., alt((ws_only.void(), line_comment.void()))).parse_next(input);
}

/// Parse whitespace including newlines.
fn ws_only<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_whitespace()).parse_next(input)
}

/// Parse a comment line: `#` or `!` up to the newline.
fn line_comment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(one_of(['#', '!']), take_till(0.., '\n')).parse_next(input)
}

/// Parse a message code.
fn catalog_key<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
    })
    .parse_next(input)
}

/// Parse the `=` or `:` separator with surrounding blanks.
fn separator(input: &mut &str) -> ModalResult<()> {
    (
        take_while(0.., is_blank),
        one_of(['=', ':']),
        take_while(0.., is_blank),
    )
        .void()
        .parse_next(input)
}

/// Parse a value, joining continuation lines.
fn value(input: &mut &str) -> String {
    let mut text = String::new();
    loop {
        let physical: ModalResult<&str> =
            terminated(take_till(0.., '\n'), opt('\n')).parse_next(input);
        let line = physical.unwrap_or_default();
        let line = line.strip_suffix('\r').unwrap_or(line);

        if continues(line) && !input.is_empty() {
            text.push_str(&line[..line.len() - 1]);
            let _: ModalResult<&str> = take_while(0.., is_blank).parse_next(input);
        } else {
            text.push_str(line);
            return text;
        }
    }
}

/// A line continues when it ends with an odd number of backslashes.
fn continues(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 1
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}
