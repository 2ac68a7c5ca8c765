use super::Value;

/// A named value bound for one interpolation request.
///
/// `precomputed` carries display text fixed at the time the parameter was
/// added. When present it replaces the formatter's output for plain
/// placeholders; expressions still see the raw `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
    pub precomputed: Option<String>,
}

impl Parameter {
    /// Creates a parameter whose display text comes from the formatter.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            precomputed: None,
        }
    }

    /// Creates a parameter with fixed display text.
    pub fn with_text(
        name: impl Into<String>,
        value: impl Into<Value>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            precomputed: Some(text.into()),
        }
    }
}
