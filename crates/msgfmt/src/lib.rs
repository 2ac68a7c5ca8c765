pub mod builder;
pub mod expression;
pub mod formatter;
mod global;
pub mod interpolator;
pub mod parser;
pub mod store;
pub mod types;

pub use builder::{MessageBuilder, MessageError, MessageFormatter};
pub use expression::{
    DisabledEvaluator, EvaluationError, ExpressionError, ExpressionEvaluator, StandardEvaluator,
    SyntaxError, Variables, compute_suggestions,
};
pub use formatter::{DefaultFormatter, ValueFormatter};
pub use global::{evaluate_expression, format_value, interpolate};
pub use interpolator::{
    DEFAULT_MAX_DEPTH, InterpolationContext, InterpolationOptions, Interpolator, MessageLookup,
};
pub use store::{Catalog, LoadError, Template, TemplateError, TemplateStore};
pub use types::{EnumValue, Parameter, SharedList, TypeName, Value};

/// Creates a `HashMap<String, Value>` from key-value pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, strings, lists, or [`SharedList`] handles directly.
///
/// # Example
///
/// ```
/// use msgfmt::{params, Value};
///
/// let p = params! { "count" => 3, "name" => "Alice" };
/// assert_eq!(p.len(), 2);
/// assert_eq!(p["count"].as_int(), Some(3));
/// assert_eq!(p["name"].as_str(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! params {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
