//! Display rules for parameter values.
//!
//! The interpolator never converts values to text itself; it asks a
//! [`ValueFormatter`]. [`DefaultFormatter`] implements the canonical rules:
//!
//! | Value                | Display                                  |
//! |----------------------|------------------------------------------|
//! | null                 | empty string                             |
//! | bool, int, float     | `true`, `42`, `3.5` (locale-insensitive) |
//! | string               | the string itself                        |
//! | list                 | elements formatted, joined with `,`      |
//! | map                  | `{key=value, ...}` in key order          |
//! | enum member          | `Type#Member`                            |
//! | one type descriptor  | fully qualified name                     |
//! | many type descriptors| qualified names joined with `, `         |
//! | annotation           | `@Type`                                  |
//!
//! Callers that need a different rendering for a single parameter attach
//! precomputed text to it instead of replacing the formatter.

use crate::types::{TypeName, Value};

/// Separator between sequence elements.
pub const SEQUENCE_SEPARATOR: &str = ",";

/// Separator between multiple type descriptors.
pub const TYPE_SEPARATOR: &str = ", ";

/// Converts values into display strings.
pub trait ValueFormatter: Send + Sync {
    /// Produces the display string for `value`.
    fn format(&self, value: &Value) -> String;
}

/// The canonical display rules described in the module documentation.
///
/// # Example
///
/// ```
/// use msgfmt::{DefaultFormatter, ValueFormatter, Value};
///
/// let value = Value::from(vec![Value::from(1), Value::from("abc"), Value::from(3)]);
/// assert_eq!(DefaultFormatter.format(&value), "1,abc,3");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl ValueFormatter for DefaultFormatter {
    fn format(&self, value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::List(items) => self.join(items),
            Value::SharedList(list) => self.join(&list.snapshot()),
            Value::Map(map) => {
                let entries: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{key}={}", self.format(value)))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Enum(member) => member.to_string(),
            Value::Types(types) => format_types(types),
            Value::Annotation(type_name) => format_annotation(type_name),
        }
    }
}

impl DefaultFormatter {
    fn join(&self, items: &[Value]) -> String {
        items
            .iter()
            .map(|item| self.format(item))
            .collect::<Vec<_>>()
            .join(SEQUENCE_SEPARATOR)
    }
}

/// Qualified type names joined with `", "`.
pub fn format_types(types: &[TypeName]) -> String {
    types
        .iter()
        .map(TypeName::qualified)
        .collect::<Vec<_>>()
        .join(TYPE_SEPARATOR)
}

/// `@` followed by the simple name of the annotation type.
pub fn format_annotation(type_name: &TypeName) -> String {
    format!("@{}", type_name.simple_name())
}
