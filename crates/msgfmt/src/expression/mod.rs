//! The embedded expression sublanguage used by `{#...}` placeholders.
//!
//! The interpolator only depends on the [`ExpressionEvaluator`] trait, so
//! applications can substitute their own engine. [`StandardEvaluator`]
//! implements the `#variable` grammar with the built-in functions `empty`,
//! `join`, `format`, `upper`, `lower`, `cap`, `size` and `default`.

mod ast;
mod error;
mod eval;
mod functions;
mod parser;
mod printf;

use std::collections::HashMap;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{EvaluationError, ExpressionError, SyntaxError, compute_suggestions};
pub use eval::{DEFAULT_AUTO_GROW_LIMIT, StandardEvaluator};
pub use functions::{ExpressionFn, FunctionRegistry};
pub use parser::parse_expression;
pub use printf::sprintf;

use crate::types::Value;

/// Variables visible to an expression, keyed by name without the `#`.
pub type Variables = HashMap<String, Value>;

/// Evaluates expression text against a set of variables.
///
/// Implementations must be safe to share across threads; a single
/// evaluator serves every message formatted by an interpolator.
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluate `expression` with `variables` in scope.
    fn evaluate(&self, expression: &str, variables: &Variables) -> Result<Value, ExpressionError>;

    /// Check that `expression` is well-formed without evaluating it.
    ///
    /// The default accepts everything.
    fn check(&self, expression: &str) -> Result<(), ExpressionError> {
        let _ = expression;
        Ok(())
    }
}

/// An evaluator that rejects every expression.
///
/// Useful when message text comes from an untrusted source: `{#...}`
/// placeholders then fail with [`EvaluationError::Unsupported`] instead of
/// running code.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEvaluator;

impl ExpressionEvaluator for DisabledEvaluator {
    fn evaluate(&self, expression: &str, _variables: &Variables) -> Result<Value, ExpressionError> {
        Err(ExpressionError::Evaluation {
            expression: expression.to_string(),
            source: EvaluationError::Unsupported,
        })
    }
}
