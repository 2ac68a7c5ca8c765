//! Process-wide default engine behind the crate's free functions.
//!
//! Shares one [`StandardEvaluator`], so parsed expressions are cached across
//! calls to [`interpolate`] and [`evaluate_expression`].

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::expression::{ExpressionError, ExpressionEvaluator, StandardEvaluator, Variables};
use crate::formatter::{DefaultFormatter, ValueFormatter};
use crate::interpolator::{InterpolationOptions, Interpolator};
use crate::types::{Parameter, Value};

static EVALUATOR: LazyLock<Arc<StandardEvaluator>> =
    LazyLock::new(|| Arc::new(StandardEvaluator::new()));

static INTERPOLATOR: LazyLock<Interpolator> = LazyLock::new(|| {
    Interpolator::builder()
        .evaluator(Arc::clone(&*EVALUATOR) as Arc<dyn ExpressionEvaluator>)
        .build()
});

/// Interpolate `template` with the default evaluator and formatter.
///
/// # Example
///
/// ```
/// use msgfmt::{interpolate, params, InterpolationOptions};
///
/// let text = interpolate(
///     "「{arrays}」",
///     &params! { "arrays" => vec![msgfmt::Value::from(1), "abc".into(), 3.into()] },
///     InterpolationOptions::single_pass(),
/// )
/// .unwrap();
/// assert_eq!(text, "「1,abc,3」");
/// ```
pub fn interpolate(
    template: &str,
    parameters: &HashMap<String, Value>,
    options: InterpolationOptions,
) -> Result<String, ExpressionError> {
    INTERPOLATOR.interpolate_with(
        template,
        parameters
            .iter()
            .map(|(name, value)| Parameter::new(name.clone(), value.clone())),
        options,
        None,
    )
}

/// Evaluate an expression with the standard grammar.
///
/// ```
/// use msgfmt::{evaluate_expression, params, Value};
///
/// let value = evaluate_expression("#join(#array, ', ')", &params! { "array" => vec![1, 2, 3] });
/// assert_eq!(value.unwrap(), Value::from("1, 2, 3"));
/// ```
pub fn evaluate_expression(expression: &str, variables: &Variables) -> Result<Value, ExpressionError> {
    EVALUATOR.evaluate(expression, variables)
}

/// Display a value with the default formatter.
pub fn format_value(value: &Value) -> String {
    DefaultFormatter.format(value)
}
