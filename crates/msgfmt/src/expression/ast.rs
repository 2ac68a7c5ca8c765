//! Parsed expression tree.

use crate::types::Value;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal: number, string, boolean, or null.
    Literal(Value),
    /// A variable reference: `#name`.
    Variable(String),
    /// A function call: `#name(args)`.
    Call { name: String, args: Vec<Expr> },
    /// An inline list: `{a, b, c}`.
    List(Vec<Expr>),
    /// Property access: `target.name` or `target?.name`.
    Property {
        target: Box<Expr>,
        name: String,
        null_safe: bool,
    },
    /// Index access: `target[index]`.
    Index { target: Box<Expr>, index: Box<Expr> },
    /// A prefix operator.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// An infix operator.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `condition ? then : otherwise`
    Ternary {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `value ?: fallback`
    Elvis { value: Box<Expr>, fallback: Box<Expr> },
}

impl Expr {
    /// Names of the variables the expression reads, without the `#`.
    ///
    /// Function names are not included. Duplicates are kept in order of
    /// appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Variable(name) => names.push(name),
            Expr::Call { args, .. } | Expr::List(args) => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
            Expr::Property { target, .. } => target.collect_variables(names),
            Expr::Index { target, index } => {
                target.collect_variables(names);
                index.collect_variables(names);
            }
            Expr::Unary { operand, .. } => operand.collect_variables(names),
            Expr::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                condition.collect_variables(names);
                then.collect_variables(names);
                otherwise.collect_variables(names);
            }
            Expr::Elvis { value, fallback } => {
                value.collect_variables(names);
                fallback.collect_variables(names);
            }
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// The operator's symbol, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expression::parse_expression;

    #[test]
    fn variables_skip_function_names() {
        let expr = parse_expression("#format('%d', #count) + #items[#i].size ?: #count").unwrap();
        assert_eq!(expr.variables(), vec!["count", "items", "i", "count"]);
    }
}
