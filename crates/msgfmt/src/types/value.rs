use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{EnumValue, TypeName};
use crate::formatter::{DefaultFormatter, ValueFormatter};

/// A runtime value that can be bound to a message parameter or produced by
/// an expression.
///
/// The enum covers the shapes the default formatter knows how to display:
/// scalars, sequences, maps, enumerated values, and type metadata.
///
/// # Example
///
/// ```
/// use msgfmt::Value;
///
/// let count: Value = 42.into();
/// let name: Value = "Alice".into();
/// let list: Value = vec![1, 2, 3].into();
///
/// assert_eq!(count.as_int(), Some(42));
/// assert_eq!(name.as_str(), Some("Alice"));
/// assert_eq!(list.len(), Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Null,

    /// A boolean.
    Bool(bool),

    /// An integer number.
    Int(i64),

    /// A floating-point number.
    Float(f64),

    /// A string.
    String(String),

    /// An immutable sequence.
    List(Vec<Value>),

    /// A shared, auto-growable sequence.
    SharedList(SharedList),

    /// String-keyed properties, used for structured objects.
    Map(BTreeMap<String, Value>),

    /// A member of an enumerated type.
    Enum(EnumValue),

    /// One or more type descriptors.
    Types(Vec<TypeName>),

    /// Annotation-like metadata naming a type.
    Annotation(TypeName),
}

impl Value {
    /// Returns true if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this value is a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Number of elements for strings (in chars), sequences, and maps.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::SharedList(list) => Some(list.len()),
            Value::Map(map) => Some(map.len()),
            Value::Types(types) => Some(types.len()),
            _ => None,
        }
    }

    /// Returns true for null, the empty string, and empty sequences or maps.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            other => other.len() == Some(0),
        }
    }

    /// Copies the elements of a sequence value.
    ///
    /// Returns `None` if the value is not a sequence.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.clone()),
            Value::SharedList(list) => Some(list.snapshot()),
            _ => None,
        }
    }

    /// A short name for the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) | Value::SharedList(_) => "list",
            Value::Map(_) => "map",
            Value::Enum(_) => "enum",
            Value::Types(_) => "types",
            Value::Annotation(_) => "annotation",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_float() == other.as_float()
            }
            (Value::String(a), Value::String(b)) => a == b,
            (
                Value::List(_) | Value::SharedList(_),
                Value::List(_) | Value::SharedList(_),
            ) => self.elements() == other.elements(),
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Types(a), Value::Types(b)) => a == b,
            (Value::Annotation(a), Value::Annotation(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&DefaultFormatter.format(self))
    }
}

/// A cloneable handle to a growable sequence.
///
/// Clones share the same storage, so growth performed through one handle
/// (for example by an index expression reading past the end) is visible
/// through every other handle.
///
/// # Example
///
/// ```
/// use msgfmt::SharedList;
///
/// let list = SharedList::new();
/// let alias = list.clone();
/// alias.push("a");
/// assert_eq!(list.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedList(Arc<Mutex<Vec<Value>>>);

impl SharedList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list holding the given values.
    pub fn from_values(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self(Arc::new(Mutex::new(
            values.into_iter().map(Into::into).collect(),
        )))
    }

    /// Current number of elements.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Appends a value.
    pub fn push(&self, value: impl Into<Value>) {
        self.lock().push(value.into());
    }

    /// Returns a copy of the element at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.lock().get(index).cloned()
    }

    /// Returns a copy of the element at `index`, first extending the list
    /// with empty strings so that `index` is in bounds.
    pub fn get_or_grow(&self, index: usize) -> Value {
        let mut items = self.lock();
        if items.len() <= index {
            items.resize(index + 1, Value::String(String::new()));
        }
        items[index].clone()
    }

    /// Copies the current elements.
    pub fn snapshot(&self) -> Vec<Value> {
        self.lock().clone()
    }

    /// Returns true if both handles point at the same storage.
    pub fn ptr_eq(&self, other: &SharedList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Value>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// From implementations for common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Int(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<SharedList> for Value {
    fn from(list: SharedList) -> Self {
        Value::SharedList(list)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Value::Enum(value)
    }
}

impl From<TypeName> for Value {
    fn from(type_name: TypeName) -> Self {
        Value::Types(vec![type_name])
    }
}
