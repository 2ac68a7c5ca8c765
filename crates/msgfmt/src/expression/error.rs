//! Error types for the expression sublanguage.

use strsim::levenshtein;
use thiserror::Error;

/// An error raised while parsing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// The expression could not be parsed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The expression parsed but failed at runtime.
    #[error("failed to evaluate '{expression}': {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: EvaluationError,
    },
}

impl ExpressionError {
    /// Returns true if this is a parse failure.
    pub fn is_syntax(&self) -> bool {
        matches!(self, ExpressionError::Syntax(_))
    }

    /// Returns true if this is a runtime failure.
    pub fn is_evaluation(&self) -> bool {
        matches!(self, ExpressionError::Evaluation { .. })
    }

    /// The runtime failure, if this is one.
    pub fn evaluation_error(&self) -> Option<&EvaluationError> {
        match self {
            ExpressionError::Evaluation { source, .. } => Some(source),
            ExpressionError::Syntax(_) => None,
        }
    }
}

/// A parse failure with its position in the expression text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at column {column} in '{expression}': {message}")]
pub struct SyntaxError {
    /// The full expression text.
    pub expression: String,
    /// 1-based character column.
    pub column: usize,
    /// What went wrong.
    pub message: String,
}

impl SyntaxError {
    /// Creates a syntax error at byte `offset` of `expression`.
    pub fn at(expression: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(expression.len());
        let column = expression
            .get(..offset)
            .map_or(offset, |prefix| prefix.chars().count())
            + 1;
        Self {
            expression: expression.to_string(),
            column,
            message: message.into(),
        }
    }
}

/// A runtime failure while evaluating a parsed expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// A function name is not registered.
    #[error("unknown function '#{name}'{}", format_suggestions(suggestions))]
    UnknownFunction {
        name: String,
        suggestions: Vec<String>,
    },

    /// A property does not exist on the receiver.
    #[error("property '{property}' not found on {kind}")]
    MissingProperty { property: String, kind: String },

    /// A property or index was read from null.
    #[error("cannot read {access} of null")]
    NullReference { access: String },

    /// An operator or access was applied to unsupported operand kinds.
    #[error("cannot apply {operation} to {found}")]
    TypeMismatch { operation: String, found: String },

    /// A sequence index is outside the valid range.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed.
    #[error("integer overflow in {operation}")]
    Overflow { operation: String },

    /// A function was called with the wrong number of arguments.
    #[error("function '#{function}' expects {expected} arguments, got {got}")]
    ArgumentCount {
        function: String,
        expected: String,
        got: usize,
    },

    /// A function rejected one of its arguments.
    #[error("function '#{function}': {message}")]
    InvalidArgument { function: String, message: String },

    /// The evaluator does not evaluate expressions at all.
    #[error("expression evaluation is not supported by this evaluator")]
    Unsupported,
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

/// Compute up to three names close to `name`, closest first.
///
/// Names within edit distance 1 qualify for short names, and within
/// distance 2 for names longer than three characters.
pub fn compute_suggestions<'a>(name: &str, available: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let max_distance = if name.chars().count() > 3 { 2 } else { 1 };
    let mut scored: Vec<(usize, &str)> = available
        .into_iter()
        .map(|candidate| (levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .collect();
    scored.sort();
    scored
        .into_iter()
        .take(3)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
