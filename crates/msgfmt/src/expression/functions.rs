//! Function registry for expressions.
//!
//! Functions are called as `#name(args)`. Built-in functions are available
//! to every evaluator; custom functions registered by the application take
//! precedence over built-ins with the same name.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use icu_casemap::CaseMapper;
use icu_locale_core::LanguageIdentifier;
use unicode_segmentation::UnicodeSegmentation;

use super::error::EvaluationError;
use super::printf::sprintf;
use crate::formatter::{DefaultFormatter, ValueFormatter};
use crate::types::Value;

/// Function signature for expression functions.
///
/// Takes the evaluated arguments and returns a value or an error.
pub type ExpressionFn = Arc<dyn Fn(&[Value]) -> Result<Value, EvaluationError> + Send + Sync>;

/// Registry of functions callable from expressions.
///
/// # Example
///
/// ```
/// use msgfmt::expression::{FunctionRegistry, EvaluationError};
/// use msgfmt::Value;
///
/// let mut registry = FunctionRegistry::new();
/// registry.register("twice", |args: &[Value]| match args {
///     [Value::Int(n)] => Ok(Value::Int(n * 2)),
///     _ => Err(EvaluationError::InvalidArgument {
///         function: "twice".to_string(),
///         message: "expected one integer".to_string(),
///     }),
/// });
/// assert!(registry.contains("twice"));
/// assert!(registry.contains("join"));
/// ```
#[derive(Clone)]
pub struct FunctionRegistry {
    /// Functions shipped with the crate (`#empty`, `#join`, ...).
    builtin: HashMap<String, ExpressionFn>,
    /// Application functions; shadow built-ins of the same name.
    custom: HashMap<String, ExpressionFn>,
}

impl FunctionRegistry {
    /// Create a registry holding the built-in functions.
    pub fn new() -> Self {
        let mut builtin: HashMap<String, ExpressionFn> = HashMap::new();
        builtin.insert("empty".to_string(), Arc::new(empty));
        builtin.insert("join".to_string(), Arc::new(join));
        builtin.insert("format".to_string(), Arc::new(format));
        builtin.insert("upper".to_string(), Arc::new(upper));
        builtin.insert("lower".to_string(), Arc::new(lower));
        builtin.insert("cap".to_string(), Arc::new(cap));
        builtin.insert("size".to_string(), Arc::new(size));
        builtin.insert("default".to_string(), Arc::new(default));
        Self {
            builtin,
            custom: HashMap::new(),
        }
    }

    /// Create a registry without any functions.
    pub fn empty() -> Self {
        Self {
            builtin: HashMap::new(),
            custom: HashMap::new(),
        }
    }

    /// Register a custom function, replacing any previous one with that name.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, EvaluationError> + Send + Sync + 'static,
    {
        self.custom.insert(name.into(), Arc::new(function));
    }

    /// Get a function by name. Custom functions win over built-ins.
    pub fn get(&self, name: &str) -> Option<&ExpressionFn> {
        self.custom.get(name).or_else(|| self.builtin.get(name))
    }

    /// Check if a function exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All function names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .custom
            .keys()
            .chain(self.builtin.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for FunctionRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

// =========================================================================
// Built-in functions
// =========================================================================

fn expect_args<'a, const N: usize>(
    function: &str,
    args: &'a [Value],
) -> Result<&'a [Value; N], EvaluationError> {
    args.try_into()
        .map_err(|_| EvaluationError::ArgumentCount {
            function: function.to_string(),
            expected: N.to_string(),
            got: args.len(),
        })
}

fn expect_str<'a>(function: &str, value: &'a Value) -> Result<&'a str, EvaluationError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(EvaluationError::InvalidArgument {
            function: function.to_string(),
            message: format!("expected a string, got {}", other.kind()),
        }),
    }
}

/// `#empty(x)`: true for null, empty strings, and empty collections.
fn empty(args: &[Value]) -> Result<Value, EvaluationError> {
    let [value] = expect_args::<1>("empty", args)?;
    Ok(Value::Bool(value.is_empty()))
}

/// `#join(seq, sep)`: display strings of the elements joined by `sep`.
///
/// A non-sequence first argument is treated as a one-element sequence,
/// and null as an empty one.
fn join(args: &[Value]) -> Result<Value, EvaluationError> {
    let [items, separator] = expect_args::<2>("join", args)?;
    let separator = DefaultFormatter.format(separator);
    let items = match items {
        Value::Null => Vec::new(),
        other => other.elements().unwrap_or_else(|| vec![other.clone()]),
    };
    let parts: Vec<String> = items.iter().map(|item| DefaultFormatter.format(item)).collect();
    Ok(Value::String(parts.join(&separator)))
}

/// `#format(pattern, args...)`: printf-style formatting.
fn format(args: &[Value]) -> Result<Value, EvaluationError> {
    let Some((pattern, rest)) = args.split_first() else {
        return Err(EvaluationError::ArgumentCount {
            function: "format".to_string(),
            expected: "at least 1".to_string(),
            got: 0,
        });
    };
    let pattern = expect_str("format", pattern)?;
    sprintf(pattern, rest).map(Value::String)
}

/// `#upper(s)`: full Unicode uppercase.
fn upper(args: &[Value]) -> Result<Value, EvaluationError> {
    let [value] = expect_args::<1>("upper", args)?;
    let text = DefaultFormatter.format(value);
    let mapper = CaseMapper::new();
    Ok(Value::String(
        mapper
            .uppercase_to_string(&text, &LanguageIdentifier::UNKNOWN)
            .to_string(),
    ))
}

/// `#lower(s)`: full Unicode lowercase.
fn lower(args: &[Value]) -> Result<Value, EvaluationError> {
    let [value] = expect_args::<1>("lower", args)?;
    let text = DefaultFormatter.format(value);
    let mapper = CaseMapper::new();
    Ok(Value::String(
        mapper
            .lowercase_to_string(&text, &LanguageIdentifier::UNKNOWN)
            .to_string(),
    ))
}

/// `#cap(s)`: uppercase the first grapheme cluster.
fn cap(args: &[Value]) -> Result<Value, EvaluationError> {
    let [value] = expect_args::<1>("cap", args)?;
    let text = DefaultFormatter.format(value);
    let mut graphemes = text.graphemes(true);
    let Some(first) = graphemes.next() else {
        return Ok(Value::String(text));
    };
    let mapper = CaseMapper::new();
    let mut result = mapper
        .uppercase_to_string(first, &LanguageIdentifier::UNKNOWN)
        .to_string();
    result.push_str(graphemes.as_str());
    Ok(Value::String(result))
}

/// `#size(x)`: length of a string, sequence, or map; 0 for null.
fn size(args: &[Value]) -> Result<Value, EvaluationError> {
    let [value] = expect_args::<1>("size", args)?;
    if value.is_null() {
        return Ok(Value::Int(0));
    }
    value
        .len()
        .map(Value::from)
        .ok_or_else(|| EvaluationError::InvalidArgument {
            function: "size".to_string(),
            message: format!("{} has no size", value.kind()),
        })
}

/// `#default(x, fallback)`: `fallback` when `x` is empty.
fn default(args: &[Value]) -> Result<Value, EvaluationError> {
    let [value, fallback] = expect_args::<2>("default", args)?;
    Ok(if value.is_empty() {
        fallback.clone()
    } else {
        value.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Result<Value, EvaluationError> {
        let registry = FunctionRegistry::new();
        let function = registry.get(name).unwrap();
        function(args)
    }

    #[test]
    fn join_formats_each_element() {
        let list = Value::from(vec![Value::from(1), Value::from("a"), Value::from(2.5)]);
        let result = call("join", &[list, Value::from(" | ")]).unwrap();
        assert_eq!(result.as_str(), Some("1 | a | 2.5"));
    }

    #[test]
    fn join_of_null_is_empty() {
        let result = call("join", &[Value::Null, Value::from(",")]).unwrap();
        assert_eq!(result.as_str(), Some(""));
    }

    #[test]
    fn cap_handles_combining_marks() {
        let result = call("cap", &[Value::from("e\u{301}cole")]).unwrap();
        assert_eq!(result.as_str(), Some("E\u{301}cole"));
    }

    #[test]
    fn case_functions() {
        assert_eq!(
            call("upper", &[Value::from("straße")]).unwrap().as_str(),
            Some("STRASSE")
        );
        assert_eq!(
            call("lower", &[Value::from("ÀB")]).unwrap().as_str(),
            Some("àb")
        );
    }

    #[test]
    fn wrong_argument_count() {
        let err = call("empty", &[]).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::ArgumentCount {
                function: "empty".to_string(),
                expected: "1".to_string(),
                got: 0,
            }
        );
    }

    #[test]
    fn custom_functions_shadow_builtins() {
        let mut registry = FunctionRegistry::new();
        registry.register("empty", |_: &[Value]| Ok(Value::from("custom")));
        let function = registry.get("empty").unwrap();
        assert_eq!(function(&[]).unwrap().as_str(), Some("custom"));
    }
}
