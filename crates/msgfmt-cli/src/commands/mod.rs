//! CLI command implementations.

mod check;
mod coverage;
mod eval;
mod render;

pub use check::{run_check, CheckArgs};
pub use coverage::{run_coverage, CoverageArgs};
pub use eval::{run_eval, EvalArgs};
pub use render::{run_render, RenderArgs};

use msgfmt::Value;

/// Parse a name=value parameter string.
pub(crate) fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter format '{s}': expected name=value"))?;
    Ok((name.to_string(), value.to_string()))
}

/// Interpret a command-line value as an integer, float, or boolean,
/// falling back to a string.
///
/// Floats need at least one digit, so `nan` and `inf` stay strings.
pub(crate) fn param_value(raw: String) -> Value {
    let numeric = raw.contains(|c: char| c.is_ascii_digit());
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Some(f) = raw.parse::<f64>().ok().filter(|_| numeric) {
        Value::from(f)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::from(b)
    } else {
        Value::from(raw)
    }
}
