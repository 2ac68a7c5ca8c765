//! Tree-walking evaluation for the standard expression grammar.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bon::Builder;
use tracing::trace;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::{EvaluationError, ExpressionError, compute_suggestions};
use super::functions::FunctionRegistry;
use super::parser::parse_expression;
use super::{ExpressionEvaluator, Variables};
use crate::formatter::{DefaultFormatter, ValueFormatter};
use crate::types::Value;

/// Default limit for auto-growing shared lists through index reads.
pub const DEFAULT_AUTO_GROW_LIMIT: usize = 1024;

/// The standard `#variable` expression grammar.
///
/// Parsed expressions are cached by source text, so evaluating the same
/// placeholder repeatedly only parses it once.
///
/// # Example
///
/// ```
/// use msgfmt::expression::{ExpressionEvaluator, StandardEvaluator};
/// use msgfmt::{params, Value};
///
/// let evaluator = StandardEvaluator::new();
/// let result = evaluator.evaluate("1 + #add", &params! { "add" => 20 }).unwrap();
/// assert_eq!(result, Value::Int(21));
///
/// let evaluator = StandardEvaluator::builder().auto_grow_limit(16).build();
/// assert_eq!(evaluator.auto_grow_limit(), 16);
/// ```
#[derive(Builder)]
pub struct StandardEvaluator {
    /// Functions callable as `#name(...)`.
    #[builder(default)]
    functions: FunctionRegistry,

    /// Index reads on a shared list below this bound grow the list instead
    /// of failing.
    #[builder(default = DEFAULT_AUTO_GROW_LIMIT)]
    auto_grow_limit: usize,

    /// Cache of parsed expressions keyed by their source text.
    #[builder(skip)]
    cache: Mutex<HashMap<String, Arc<Expr>>>,
}

impl Default for StandardEvaluator {
    fn default() -> Self {
        StandardEvaluator::builder().build()
    }
}

impl StandardEvaluator {
    /// Create an evaluator with the built-in functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// The function registry (read-only).
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// The function registry (mutable) for registering custom functions.
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// The configured auto-grow limit.
    pub fn auto_grow_limit(&self) -> usize {
        self.auto_grow_limit
    }

    /// Clear the parsed-expression cache.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Return the number of cached parsed expressions.
    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    /// Parse and cache an expression without evaluating it.
    pub fn parse(&self, expression: &str) -> Result<Arc<Expr>, ExpressionError> {
        if let Some(expr) = self.lock_cache().get(expression) {
            return Ok(Arc::clone(expr));
        }
        let expr = Arc::new(parse_expression(expression)?);
        self.lock_cache()
            .insert(expression.to_string(), Arc::clone(&expr));
        Ok(expr)
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<String, Arc<Expr>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn eval(&self, expr: &Expr, vars: &Variables) -> Result<Value, EvaluationError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable(name) => Ok(vars.get(name).cloned().unwrap_or_default()),
            Expr::Call { name, args } => {
                let function = self.functions.get(name).ok_or_else(|| {
                    EvaluationError::UnknownFunction {
                        name: name.clone(),
                        suggestions: compute_suggestions(name, self.functions.names()),
                    }
                })?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, vars))
                    .collect::<Result<Vec<_>, _>>()?;
                trace!(function = %name, args = args.len(), "calling expression function");
                function(&args)
            }
            Expr::List(items) => items
                .iter()
                .map(|item| self.eval(item, vars))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Property {
                target,
                name,
                null_safe,
            } => {
                let target = self.eval(target, vars)?;
                if target.is_null() && *null_safe {
                    return Ok(Value::Null);
                }
                property(&target, name)
            }
            Expr::Index { target, index } => {
                let target = self.eval(target, vars)?;
                let index = self.eval(index, vars)?;
                self.index(&target, &index)
            }
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand, vars)?;
                unary(*op, &operand)
            }
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
            } => {
                if !truthy(&self.eval(left, vars)?, "&&")? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(truthy(&self.eval(right, vars)?, "&&")?))
            }
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
            } => {
                if truthy(&self.eval(left, vars)?, "||")? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(truthy(&self.eval(right, vars)?, "||")?))
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left, vars)?;
                let right = self.eval(right, vars)?;
                binary(*op, &left, &right)
            }
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                if truthy(&self.eval(condition, vars)?, "?:")? {
                    self.eval(then, vars)
                } else {
                    self.eval(otherwise, vars)
                }
            }
            Expr::Elvis { value, fallback } => {
                let value = self.eval(value, vars)?;
                if value.is_null() || value.as_str() == Some("") {
                    self.eval(fallback, vars)
                } else {
                    Ok(value)
                }
            }
        }
    }

    fn index(&self, target: &Value, index: &Value) -> Result<Value, EvaluationError> {
        match target {
            Value::Null => Err(EvaluationError::NullReference {
                access: "index".to_string(),
            }),
            Value::Map(map) => {
                let key = DefaultFormatter.format(index);
                map.get(&key)
                    .cloned()
                    .ok_or_else(|| EvaluationError::MissingProperty {
                        property: key,
                        kind: target.kind().to_string(),
                    })
            }
            Value::List(items) => {
                let i = position(index, items.len())?;
                Ok(items[i].clone())
            }
            Value::String(s) => {
                let len = s.chars().count();
                let i = position(index, len)?;
                Ok(s.chars().nth(i).map(Value::from).unwrap_or_default())
            }
            Value::SharedList(list) => {
                let len = list.len();
                let Some(n) = index.as_int() else {
                    return Err(index_mismatch(index));
                };
                match usize::try_from(n) {
                    Ok(i) if i < len => Ok(list.get(i).unwrap_or_default()),
                    Ok(i) if i < self.auto_grow_limit => {
                        trace!(index = i, len, "growing shared list");
                        Ok(list.get_or_grow(i))
                    }
                    _ => Err(EvaluationError::IndexOutOfBounds { index: n, len }),
                }
            }
            other => Err(EvaluationError::TypeMismatch {
                operation: "index".to_string(),
                found: other.kind().to_string(),
            }),
        }
    }
}

impl ExpressionEvaluator for StandardEvaluator {
    fn evaluate(&self, expression: &str, variables: &Variables) -> Result<Value, ExpressionError> {
        let expr = self.parse(expression)?;
        self.eval(&expr, variables)
            .map_err(|source| ExpressionError::Evaluation {
                expression: expression.to_string(),
                source,
            })
    }

    fn check(&self, expression: &str) -> Result<(), ExpressionError> {
        self.parse(expression).map(|_| ())
    }
}

/// Validate a sequence index against `len`.
fn position(index: &Value, len: usize) -> Result<usize, EvaluationError> {
    let Some(n) = index.as_int() else {
        return Err(index_mismatch(index));
    };
    usize::try_from(n)
        .ok()
        .filter(|i| *i < len)
        .ok_or(EvaluationError::IndexOutOfBounds { index: n, len })
}

fn index_mismatch(index: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation: "list index".to_string(),
        found: index.kind().to_string(),
    }
}

fn property(target: &Value, name: &str) -> Result<Value, EvaluationError> {
    match target {
        Value::Null => Err(EvaluationError::NullReference {
            access: format!("property '{name}'"),
        }),
        Value::Map(map) if map.contains_key(name) => Ok(map[name].clone()),
        Value::Enum(member) if name == "name" => Ok(Value::String(member.member.clone())),
        _ if name == "size" || name == "length" => {
            target
                .len()
                .map(Value::from)
                .ok_or_else(|| EvaluationError::MissingProperty {
                    property: name.to_string(),
                    kind: target.kind().to_string(),
                })
        }
        _ => Err(EvaluationError::MissingProperty {
            property: name.to_string(),
            kind: target.kind().to_string(),
        }),
    }
}

fn truthy(value: &Value, operation: &str) -> Result<bool, EvaluationError> {
    value.as_bool().ok_or_else(|| EvaluationError::TypeMismatch {
        operation: format!("'{operation}' condition"),
        found: value.kind().to_string(),
    })
}

fn unary(op: UnaryOp, operand: &Value) -> Result<Value, EvaluationError> {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| EvaluationError::Overflow {
                operation: "negation".to_string(),
            }),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, other) => Err(EvaluationError::TypeMismatch {
            operation: "'-'".to_string(),
            found: other.kind().to_string(),
        }),
        (UnaryOp::Not, other) => Err(EvaluationError::TypeMismatch {
            operation: "'!'".to_string(),
            found: other.kind().to_string(),
        }),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(op, left, right)?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::Add if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) => {
            Ok(Value::String(format!(
                "{}{}",
                DefaultFormatter.format(left),
                DefaultFormatter.format(right)
            )))
        }
        _ => arithmetic(op, left, right),
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Ordering, EvaluationError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ if left.is_number() && right.is_number() => left
            .as_float()
            .zip(right.as_float())
            .and_then(|(a, b)| a.partial_cmp(&b)),
        _ => None,
    };
    ordering.ok_or_else(|| mismatch(op, left, right))
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(*b),
                BinaryOp::Sub => a.checked_sub(*b),
                BinaryOp::Mul => a.checked_mul(*b),
                BinaryOp::Div | BinaryOp::Mod if *b == 0 => {
                    return Err(EvaluationError::DivisionByZero);
                }
                BinaryOp::Div => a.checked_div(*b),
                BinaryOp::Mod => a.checked_rem(*b),
                _ => return Err(mismatch(op, left, right)),
            };
            result
                .map(Value::Int)
                .ok_or_else(|| EvaluationError::Overflow {
                    operation: format!("'{}'", op.symbol()),
                })
        }
        _ if left.is_number() && right.is_number() => {
            let (Some(a), Some(b)) = (left.as_float(), right.as_float()) else {
                return Err(mismatch(op, left, right));
            };
            Ok(Value::Float(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                _ => return Err(mismatch(op, left, right)),
            }))
        }
        _ => Err(mismatch(op, left, right)),
    }
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation: format!("'{}'", op.symbol()),
        found: format!("{} and {}", left.kind(), right.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str) -> Result<Value, EvaluationError> {
        let evaluator = StandardEvaluator::new();
        let expr = parse_expression(source).unwrap();
        evaluator.eval(&expr, &Variables::new())
    }

    #[test]
    fn numeric_promotion() {
        assert_eq!(eval("7 / 2").unwrap(), Value::Int(3));
        assert_eq!(eval("7 / 2.0").unwrap(), Value::Float(3.5));
        assert_eq!(eval("7 % 4").unwrap(), Value::Int(3));
        assert_eq!(eval("1 < 1.5").unwrap(), Value::Bool(true));
    }

    #[test]
    fn integer_errors() {
        assert_eq!(eval("1 / 0"), Err(EvaluationError::DivisionByZero));
        assert!(matches!(
            eval("9223372036854775807 + 1"),
            Err(EvaluationError::Overflow { .. })
        ));
    }

    #[test]
    fn string_concatenation_uses_display_rules() {
        assert_eq!(eval("'n=' + 1.5").unwrap(), Value::from("n=1.5"));
        assert_eq!(eval("{1, 2} + ''").unwrap(), Value::from("1,2"));
    }

    #[test]
    fn logical_operators_short_circuit() {
        assert_eq!(eval("false && 1").unwrap(), Value::Bool(false));
        assert_eq!(eval("true or 1").unwrap(), Value::Bool(true));
        assert!(eval("1 && true").is_err());
    }

    #[test]
    fn elvis_falls_back_on_null_and_empty_string() {
        assert_eq!(eval("null ?: 'x'").unwrap(), Value::from("x"));
        assert_eq!(eval("'' ?: 'x'").unwrap(), Value::from("x"));
        assert_eq!(eval("0 ?: 'x'").unwrap(), Value::Int(0));
    }

    #[test]
    fn inline_list_index_and_size() {
        assert_eq!(eval("{10, 20, 30}[1]").unwrap(), Value::Int(20));
        assert_eq!(eval("{10, 20, 30}.size").unwrap(), Value::Int(3));
        assert_eq!(eval("'héllo'[1]").unwrap(), Value::from("é"));
        assert_eq!(
            eval("{1}[5]"),
            Err(EvaluationError::IndexOutOfBounds { index: 5, len: 1 })
        );
    }
}
