//! printf-style formatting for the `#format` function.
//!
//! Supported conversions: `%s %d %f %e %x %X %%`, with the flags `-`
//! (left-align), `0` (zero-pad) and `+` (always show sign), an optional
//! width, and an optional precision (`.N`).

use std::iter::{Peekable, repeat_n};
use std::str::Chars;

use super::error::EvaluationError;
use crate::formatter::{DefaultFormatter, ValueFormatter};
use crate::types::Value;

/// Largest accepted width or precision.
const MAX_FIELD: usize = 1024;

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    width: usize,
    precision: Option<usize>,
}

/// Format `pattern`, consuming `args` left to right.
pub fn sprintf(pattern: &str, args: &[Value]) -> Result<String, EvaluationError> {
    let mut out = String::with_capacity(pattern.len());
    let mut args = args.iter();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                '+' => spec.plus = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = number(&mut chars, "width")?;
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(number(&mut chars, "precision")?);
        }

        let Some(conversion) = chars.next() else {
            return Err(invalid("pattern ends inside a conversion"));
        };
        if conversion == '%' {
            out.push('%');
            continue;
        }
        let arg = args
            .next()
            .ok_or_else(|| invalid(format!("missing argument for '%{conversion}'")))?;
        let body = convert(conversion, spec, arg)?;
        pad(&mut out, &body, spec);
    }

    Ok(out)
}

/// Read a run of decimal digits, 0 if there are none.
fn number(chars: &mut Peekable<Chars<'_>>, what: &str) -> Result<usize, EvaluationError> {
    let mut value = 0usize;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit as usize))
            .filter(|&v| v <= MAX_FIELD)
            .ok_or_else(|| invalid(format!("{what} is larger than {MAX_FIELD}")))?;
        chars.next();
    }
    Ok(value)
}

fn convert(conversion: char, spec: Spec, arg: &Value) -> Result<String, EvaluationError> {
    match conversion {
        's' => {
            let text = DefaultFormatter.format(arg);
            Ok(match spec.precision {
                Some(p) => text.chars().take(p).collect(),
                None => text,
            })
        }
        'd' => {
            let n = arg
                .as_int()
                .ok_or_else(|| mismatch(conversion, arg))?;
            Ok(signed(n.to_string(), n >= 0, spec))
        }
        'x' | 'X' => {
            let n = arg
                .as_int()
                .ok_or_else(|| mismatch(conversion, arg))?;
            let hex = format!("{n:x}");
            Ok(if conversion == 'X' {
                hex.to_uppercase()
            } else {
                hex
            })
        }
        'f' => {
            let f = arg
                .as_float()
                .ok_or_else(|| mismatch(conversion, arg))?;
            let precision = spec.precision.unwrap_or(6);
            Ok(signed(format!("{f:.precision$}"), !f.is_sign_negative(), spec))
        }
        'e' => {
            let f = arg
                .as_float()
                .ok_or_else(|| mismatch(conversion, arg))?;
            let precision = spec.precision.unwrap_or(6);
            Ok(signed(scientific(f, precision), !f.is_sign_negative(), spec))
        }
        other => Err(invalid(format!("unsupported conversion '%{other}'"))),
    }
}

/// Scientific notation with a signed, two-digit exponent: `3.10e+00`.
fn scientific(f: f64, precision: usize) -> String {
    let raw = format!("{f:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

fn signed(text: String, non_negative: bool, spec: Spec) -> String {
    if spec.plus && non_negative {
        format!("+{text}")
    } else {
        text
    }
}

fn pad(out: &mut String, body: &str, spec: Spec) {
    let len = body.chars().count();
    if len >= spec.width {
        out.push_str(body);
        return;
    }
    let fill = spec.width - len;
    if spec.left {
        out.push_str(body);
        out.extend(repeat_n(' ', fill));
    } else if spec.zero {
        // Zeros go after the sign.
        let (sign, digits) = match body.chars().next() {
            Some(c @ ('-' | '+')) => (Some(c), &body[1..]),
            _ => (None, body),
        };
        out.extend(sign);
        out.extend(repeat_n('0', fill));
        out.push_str(digits);
    } else {
        out.extend(repeat_n(' ', fill));
        out.push_str(body);
    }
}

fn invalid(message: impl Into<String>) -> EvaluationError {
    EvaluationError::InvalidArgument {
        function: "format".to_string(),
        message: message.into(),
    }
}

fn mismatch(conversion: char, arg: &Value) -> EvaluationError {
    invalid(format!("'%{conversion}' cannot format a {}", arg.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(pattern: &str, args: &[Value]) -> String {
        sprintf(pattern, args).unwrap()
    }

    #[test]
    fn fixed_point_precision() {
        assert_eq!(fmt("%1.2f", &[Value::Float(3.1)]), "3.10");
        assert_eq!(fmt("%.0f", &[Value::Int(2)]), "2");
    }

    #[test]
    fn width_and_flags() {
        assert_eq!(fmt("[%5d]", &[Value::Int(42)]), "[   42]");
        assert_eq!(fmt("[%-5d]", &[Value::Int(42)]), "[42   ]");
        assert_eq!(fmt("[%05d]", &[Value::Int(-42)]), "[-0042]");
        assert_eq!(fmt("[%+d]", &[Value::Int(7)]), "[+7]");
    }

    #[test]
    fn strings_and_percent() {
        assert_eq!(fmt("%s: 100%%", &[Value::from("done")]), "done: 100%");
        assert_eq!(fmt("%.3s", &[Value::from("abcdef")]), "abc");
    }

    #[test]
    fn scientific_uses_two_digit_exponent() {
        assert_eq!(fmt("%.2e", &[Value::Float(1234.5)]), "1.23e+03");
        assert_eq!(fmt("%.1e", &[Value::Float(0.05)]), "5.0e-02");
    }

    #[test]
    fn hex() {
        assert_eq!(fmt("%x/%X", &[Value::Int(255), Value::Int(255)]), "ff/FF");
    }

    #[test]
    fn plus_flag_on_negative_zero() {
        assert_eq!(fmt("%+.2f", &[Value::Float(-0.0)]), "-0.00");
        assert_eq!(fmt("%+.2f", &[Value::Float(0.0)]), "+0.00");
        assert_eq!(fmt("%+.1e", &[Value::Float(-0.0)]), "-0.0e+00");
    }

    #[test]
    fn oversized_fields_are_rejected() {
        assert!(sprintf("%99999999999999999999d", &[Value::Int(1)]).is_err());
        assert!(sprintf("%2000d", &[Value::Int(1)]).is_err());
        assert!(sprintf("%.5000f", &[Value::Float(1.0)]).is_err());
        assert_eq!(fmt("%1024d", &[Value::Int(1)]).len(), 1024);
    }

    #[test]
    fn missing_argument_is_an_error() {
        assert!(sprintf("%d and %d", &[Value::Int(1)]).is_err());
        assert!(sprintf("%d", &[Value::from("x")]).is_err());
    }
}
