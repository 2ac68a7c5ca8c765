//! Template scanner using winnow.
//!
//! Scans template text left to right into segments. Handles:
//! - Literal text
//! - Plain placeholders: `{name}`
//! - Expression placeholders: `{#expression}` with nested braces and quotes
//! - Escape sequences: `\{` `\}` `\\`
//!
//! Scanning is tolerant: any brace that does not start a well-formed
//! placeholder is kept as literal text, so scanning never fails.

use super::ast::{ParsedTemplate, Segment};
use winnow::combinator::{alt, preceded, repeat};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

/// Scan a template string into segments.
///
/// # Example
///
/// ```
/// use msgfmt::parser::{parse_template, Segment};
///
/// let parsed = parse_template("Hi {name}, {#n + 1} \\{x\\} {#1 + #n}");
/// assert_eq!(parsed.segments[1], Segment::Placeholder("name".to_string()));
/// assert_eq!(parsed.segments[3], Segment::Expression("#n + 1".to_string()));
/// assert_eq!(parsed.segments[9], Segment::Expression("1 + #n".to_string()));
/// assert_eq!(parsed.segments[5], Segment::Escape('{'));
/// ```
pub fn parse_template(input: &str) -> ParsedTemplate {
    let mut remaining = input;
    let parsed: ModalResult<Vec<Segment>> = repeat(0.., segment).parse_next(&mut remaining);
    match parsed {
        Ok(segments) if remaining.is_empty() => ParsedTemplate {
            segments: merge_literals(segments),
        },
        // Every character is accepted as a literal, so this is unreachable in
        // practice; keep the text rather than losing it.
        _ => ParsedTemplate {
            segments: vec![Segment::Literal(input.to_string())],
        },
    }
}

/// Returns true if `text` contains a plain or expression placeholder.
///
/// Escaped braces do not count.
pub fn contains_placeholder(text: &str) -> bool {
    text.contains('{') && parse_template(text).has_placeholders()
}

/// Resolves escape sequences, leaving everything else untouched.
///
/// ```
/// use msgfmt::parser::unescape;
///
/// assert_eq!(unescape(r"\{abc\}={x}"), "{abc}={x}");
/// assert_eq!(unescape(r"C:\temp"), r"C:\temp");
/// ```
pub fn unescape(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for segment in parse_template(text).segments {
        match segment {
            Segment::Escape(c) => out.push(c),
            other => other.write_source(&mut out),
        }
    }
    out
}

/// Merge adjacent Literal segments into single segments.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(prev)) = result.last_mut() {
                    prev.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }

    result
}

/// Parse a single segment (escape, placeholder, or literal).
fn segment(input: &mut &str) -> ModalResult<Segment> {
    alt((escape_sequence, expression, placeholder, literal_char)).parse_next(input)
}

/// Parse escape sequences: `\{` -> `{`, `\}` -> `}`, `\\` -> `\`
fn escape_sequence(input: &mut &str) -> ModalResult<Segment> {
    preceded('\\', one_of(['{', '}', '\\']))
        .map(Segment::Escape)
        .parse_next(input)
}

/// Parse a single literal character.
fn literal_char(input: &mut &str) -> ModalResult<Segment> {
    any.map(|c: char| Segment::Literal(c.to_string()))
        .parse_next(input)
}

/// Parse a plain placeholder: `{name}`
fn placeholder(input: &mut &str) -> ModalResult<Segment> {
    let _ = '{'.parse_next(input)?;
    let name = (one_of(is_name_start), take_while(0.., is_name_cont))
        .take()
        .parse_next(input)?;
    let _ = '}'.parse_next(input)?;
    Ok(Segment::Placeholder(name.to_string()))
}

/// Parse an expression placeholder: `{#body}`
///
/// The `#` after the brace marks the placeholder. It stays part of the
/// expression when it begins a `#name` reference (`{#a + 1}`) and is
/// dropped otherwise (`{#1 + #a}`, `{#(#a)}`). The body ends at the first
/// `}` that is not nested inside braces or a quoted string.
fn expression(input: &mut &str) -> ModalResult<Segment> {
    let _ = "{#".parse_next(input)?;
    let Some(end) = expression_end(input) else {
        return Err(ErrMode::Backtrack(ContextError::new()));
    };
    let body = &input[..end];
    if body.trim().is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    *input = &input[end + 1..];
    if body.starts_with(is_name_start) {
        Ok(Segment::Expression(format!("#{body}")))
    } else {
        Ok(Segment::Expression(body.to_string()))
    }
}

/// Returns true if an expression text begins with a `#name` reference.
pub(crate) fn starts_with_reference(expression: &str) -> bool {
    expression
        .strip_prefix('#')
        .is_some_and(|rest| rest.starts_with(is_name_start))
}

/// Byte offset of the `}` closing an expression body, if any.
fn expression_end(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            // A doubled quote closes and immediately reopens, which is
            // exactly the escape rule for quoted literals.
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Check if a character can start a placeholder name.
fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if a character can continue a placeholder name.
fn is_name_cont(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_end_skips_nested_braces_and_quotes() {
        assert_eq!(expression_end("{1, 2}[0]} tail"), Some(9));
        assert_eq!(expression_end("'}' + \"}\"}"), Some(9));
        assert_eq!(expression_end("'it''s'}"), Some(7));
        assert_eq!(expression_end("unclosed"), None);
    }

    #[test]
    fn reference_prefix_detection() {
        assert!(starts_with_reference("#a + 1"));
        assert!(starts_with_reference("#format('%d', 1)"));
        assert!(!starts_with_reference("1 + #a"));
        assert!(!starts_with_reference("#1"));
        assert!(!starts_with_reference("(#a)"));
    }

    #[test]
    fn name_characters() {
        assert!(is_name_start('日'));
        assert!(!is_name_start('1'));
        assert!(is_name_cont('.'));
        assert!(!is_name_cont(' '));
    }
}
