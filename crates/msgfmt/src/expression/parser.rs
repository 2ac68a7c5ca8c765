//! Expression lexer (winnow) and recursive-descent parser.
//!
//! Precedence, lowest first:
//!
//! | Level    | Operators                               |
//! |----------|-----------------------------------------|
//! | ternary  | `c ? a : b`                             |
//! | elvis    | `a ?: b`                                |
//! | or       | `\|\|` `or`                             |
//! | and      | `&&` `and`                              |
//! | equality | `==` `!=` `eq` `ne`                     |
//! | compare  | `<` `<=` `>` `>=` `lt` `le` `gt` `ge`   |
//! | additive | `+` `-`                                 |
//! | term     | `*` `/` `%` `div` `mod`                 |
//! | unary    | `-` `!` `not`                           |
//! | postfix  | `.name` `?.name` `[index]`              |

use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{none_of, one_of, take_while};

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::SyntaxError;
use crate::types::Value;

/// Parse an expression string into an [`Expr`] tree.
///
/// # Example
///
/// ```
/// use msgfmt::expression::{parse_expression, Expr};
///
/// let expr = parse_expression("#empty(#label)").unwrap();
/// assert!(matches!(expr, Expr::Call { ref name, .. } if name == "empty"));
///
/// // Bare identifiers are not variables.
/// assert!(parse_expression("label").is_err());
/// ```
pub fn parse_expression(source: &str) -> Result<Expr, SyntaxError> {
    let tokens = tokenize(source)?;
    let mut parser = ExprParser {
        source,
        tokens,
        pos: 0,
        depth: 0,
    };
    if parser.at_end() {
        return Err(parser.error("empty expression"));
    }
    let expr = parser.expression()?;
    if !parser.at_end() {
        let message = format!("unexpected {}", parser.peek().describe());
        return Err(parser.error(message));
    }
    Ok(expr)
}

// =========================================================================
// Lexer
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Var(String),
    Punct(&'static str),
    End,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Int(n) => format!("number {n}"),
            TokenKind::Float(f) => format!("number {f}"),
            TokenKind::Str(s) => format!("string '{s}'"),
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Var(name) => format!("'#{name}'"),
            TokenKind::Punct(p) => format!("'{p}'"),
            TokenKind::End => "end of expression".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

/// Raw lexeme before number conversion.
enum Lexeme<'i> {
    Number(&'i str),
    Str(String),
    Ident(&'i str),
    Var(&'i str),
    Punct(&'static str),
}

fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut input = source;
    let mut tokens = Vec::new();
    loop {
        let _: ModalResult<&str> = multispace0.parse_next(&mut input);
        let offset = source.len() - input.len();
        if input.is_empty() {
            tokens.push(Token {
                kind: TokenKind::End,
                offset,
            });
            return Ok(tokens);
        }
        let kind = match lexeme.parse_next(&mut input) {
            Ok(Lexeme::Number(text)) => number_token(source, offset, text)?,
            Ok(Lexeme::Str(text)) => TokenKind::Str(text),
            Ok(Lexeme::Ident(name)) => TokenKind::Ident(name.to_string()),
            Ok(Lexeme::Var(name)) => TokenKind::Var(name.to_string()),
            Ok(Lexeme::Punct(p)) => TokenKind::Punct(p),
            Err(_) => {
                let message = match input.chars().next() {
                    Some(q @ ('\'' | '"')) => format!("unterminated string starting with {q}"),
                    Some('#') => "expected a name after '#'".to_string(),
                    Some(c) => format!("unexpected character '{c}'"),
                    None => "unexpected end of expression".to_string(),
                };
                return Err(SyntaxError::at(source, offset, message));
            }
        };
        tokens.push(Token { kind, offset });
    }
}

fn number_token(source: &str, offset: usize, text: &str) -> Result<TokenKind, SyntaxError> {
    if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>()
            .map(TokenKind::Float)
            .map_err(|_| SyntaxError::at(source, offset, format!("invalid number '{text}'")))
    } else {
        text.parse::<i64>().map(TokenKind::Int).map_err(|_| {
            SyntaxError::at(source, offset, format!("integer '{text}' is out of range"))
        })
    }
}

fn lexeme<'i>(input: &mut &'i str) -> ModalResult<Lexeme<'i>> {
    alt((
        number.map(Lexeme::Number),
        single_quoted.map(Lexeme::Str),
        double_quoted.map(Lexeme::Str),
        preceded('#', identifier).map(Lexeme::Var),
        identifier.map(Lexeme::Ident),
        punct.map(Lexeme::Punct),
    ))
    .parse_next(input)
}

/// Parse a number: digits, optional fraction, optional exponent.
fn number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

/// Parse a single-quoted string; `''` is an escaped quote.
fn single_quoted(input: &mut &str) -> ModalResult<String> {
    delimited(
        '\'',
        repeat(0.., alt(("''".value('\''), none_of(['\''])))),
        '\'',
    )
    .parse_next(input)
}

/// Parse a double-quoted string; `""` is an escaped quote.
fn double_quoted(input: &mut &str) -> ModalResult<String> {
    delimited(
        '"',
        repeat(0.., alt(("\"\"".value('"'), none_of(['"'])))),
        '"',
    )
    .parse_next(input)
}

/// Parse an identifier.
fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// Parse an operator or delimiter, longest match first.
fn punct(input: &mut &str) -> ModalResult<&'static str> {
    alt((
        alt((
            "?:".value("?:"),
            "?.".value("?."),
            "==".value("=="),
            "!=".value("!="),
            "<=".value("<="),
            ">=".value(">="),
            "&&".value("&&"),
            "||".value("||"),
        )),
        alt((
            "+".value("+"),
            "-".value("-"),
            "*".value("*"),
            "/".value("/"),
            "%".value("%"),
            "<".value("<"),
            ">".value(">"),
            "!".value("!"),
            "?".value("?"),
            ":".value(":"),
        )),
        alt((
            ".".value("."),
            ",".value(","),
            "(".value("("),
            ")".value(")"),
            "[".value("["),
            "]".value("]"),
            "{".value("{"),
            "}".value("}"),
        )),
    ))
    .parse_next(input)
}

// =========================================================================
// Parser
// =========================================================================

const KEYWORD_OPERATORS: &[&str] = &[
    "and", "or", "not", "div", "mod", "eq", "ne", "lt", "le", "gt", "ge",
];

const OR_OPS: &[(&str, BinaryOp)] = &[("||", BinaryOp::Or), ("or", BinaryOp::Or)];
const AND_OPS: &[(&str, BinaryOp)] = &[("&&", BinaryOp::And), ("and", BinaryOp::And)];
const EQUALITY_OPS: &[(&str, BinaryOp)] = &[
    ("==", BinaryOp::Eq),
    ("!=", BinaryOp::Ne),
    ("eq", BinaryOp::Eq),
    ("ne", BinaryOp::Ne),
];
const COMPARE_OPS: &[(&str, BinaryOp)] = &[
    ("<", BinaryOp::Lt),
    ("<=", BinaryOp::Le),
    (">", BinaryOp::Gt),
    (">=", BinaryOp::Ge),
    ("lt", BinaryOp::Lt),
    ("le", BinaryOp::Le),
    ("gt", BinaryOp::Gt),
    ("ge", BinaryOp::Ge),
];
const ADDITIVE_OPS: &[(&str, BinaryOp)] = &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)];
const TERM_OPS: &[(&str, BinaryOp)] = &[
    ("*", BinaryOp::Mul),
    ("/", BinaryOp::Div),
    ("%", BinaryOp::Mod),
    ("div", BinaryOp::Div),
    ("mod", BinaryOp::Mod),
];

/// Deepest expression tree the parser builds.
const MAX_NESTING: usize = 128;

struct ExprParser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

type ParseResult = Result<Expr, SyntaxError>;

impl ExprParser<'_> {
    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(&TokenKind::End, |token| &token.kind)
    }

    fn at_end(&self) -> bool {
        matches!(self.peek(), TokenKind::End)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len(), |token| token.offset)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.source, self.offset(), message)
    }

    /// Returns true if the next token is the operator or keyword `symbol`.
    fn check(&self, symbol: &str) -> bool {
        match self.peek() {
            TokenKind::Punct(p) => *p == symbol,
            TokenKind::Ident(word) => word == symbol,
            _ => false,
        }
    }

    fn eat(&mut self, symbol: &str) -> bool {
        if self.check(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, symbol: &str) -> Result<(), SyntaxError> {
        if self.eat(symbol) {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected '{symbol}', found {}",
                self.peek().describe()
            )))
        }
    }

    /// Count one level of nesting, failing past [`MAX_NESTING`].
    fn descend(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("expression is nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `parse` one nesting level down.
    fn nested(&mut self, parse: fn(&mut Self) -> ParseResult) -> ParseResult {
        self.descend()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expression(&mut self) -> ParseResult {
        self.nested(Self::ternary)
    }

    fn ternary(&mut self) -> ParseResult {
        let condition = self.elvis()?;
        if !self.eat("?") {
            return Ok(condition);
        }
        let then = self.expression()?;
        self.expect(":")?;
        let otherwise = self.expression()?;
        Ok(Expr::Ternary {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn elvis(&mut self) -> ParseResult {
        let value = self.or()?;
        if !self.eat("?:") {
            return Ok(value);
        }
        let fallback = self.nested(Self::elvis)?;
        Ok(Expr::Elvis {
            value: Box::new(value),
            fallback: Box::new(fallback),
        })
    }

    fn or(&mut self) -> ParseResult {
        self.binary(OR_OPS, Self::and)
    }

    fn and(&mut self) -> ParseResult {
        self.binary(AND_OPS, Self::equality)
    }

    fn equality(&mut self) -> ParseResult {
        self.binary(EQUALITY_OPS, Self::compare)
    }

    fn compare(&mut self) -> ParseResult {
        self.binary(COMPARE_OPS, Self::additive)
    }

    fn additive(&mut self) -> ParseResult {
        self.binary(ADDITIVE_OPS, Self::term)
    }

    fn term(&mut self) -> ParseResult {
        self.binary(TERM_OPS, Self::unary)
    }

    /// Parse a left-associative chain of operators from `ops`.
    fn binary(
        &mut self,
        ops: &[(&str, BinaryOp)],
        operand: fn(&mut Self) -> ParseResult,
    ) -> ParseResult {
        let start = self.depth;
        let mut left = operand(self)?;
        while let Some(op) = ops
            .iter()
            .find(|(symbol, _)| self.check(symbol))
            .map(|(_, op)| *op)
        {
            self.descend()?;
            self.advance();
            let right = operand(self)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = start;
        Ok(left)
    }

    fn unary(&mut self) -> ParseResult {
        let op = if self.eat("-") {
            UnaryOp::Neg
        } else if self.eat("!") || self.eat("not") {
            UnaryOp::Not
        } else {
            return self.postfix();
        };
        let operand = self.nested(Self::unary)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self) -> ParseResult {
        let start = self.depth;
        let mut expr = self.primary()?;
        loop {
            if self.check(".") || self.check("?.") || self.check("[") {
                self.descend()?;
            }
            if self.check(".") || self.check("?.") {
                let null_safe = self.check("?.");
                self.advance();
                let TokenKind::Ident(name) = self.peek().clone() else {
                    return Err(self.error(format!(
                        "expected a property name, found {}",
                        self.peek().describe()
                    )));
                };
                self.advance();
                expr = Expr::Property {
                    target: Box::new(expr),
                    name,
                    null_safe,
                };
            } else if self.eat("[") {
                let index = self.expression()?;
                self.expect("]")?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                self.depth = start;
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> ParseResult {
        match self.peek().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::Literal(Value::Int(n)))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(Expr::Literal(Value::Float(f)))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Literal(Value::String(s)))
            }
            TokenKind::Var(name) => {
                self.advance();
                if self.eat("(") {
                    let args = self.arguments(")")?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            TokenKind::Ident(word) => match word.as_str() {
                "true" => {
                    self.advance();
                    Ok(Expr::Literal(Value::Bool(true)))
                }
                "false" => {
                    self.advance();
                    Ok(Expr::Literal(Value::Bool(false)))
                }
                "null" => {
                    self.advance();
                    Ok(Expr::Literal(Value::Null))
                }
                w if KEYWORD_OPERATORS.contains(&w) => {
                    Err(self.error(format!("unexpected operator '{w}'")))
                }
                _ => Err(self.error(format!(
                    "unknown identifier '{word}'; variables are referenced as '#{word}'"
                ))),
            },
            TokenKind::Punct("(") => {
                self.advance();
                let inner = self.expression()?;
                self.expect(")")?;
                Ok(inner)
            }
            TokenKind::Punct("{") => {
                self.advance();
                Ok(Expr::List(self.arguments("}")?))
            }
            other => Err(self.error(format!("unexpected {}", other.describe()))),
        }
    }

    /// Parse comma-separated expressions up to and including `close`.
    fn arguments(&mut self, close: &str) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();
        if self.eat(close) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(close) {
                return Ok(args);
            }
            self.expect(",")?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn lexes_operators_longest_first() {
        assert_eq!(
            kinds("#a ?: 'x' <= 2.5"),
            vec![
                TokenKind::Var("a".to_string()),
                TokenKind::Punct("?:"),
                TokenKind::Str("x".to_string()),
                TokenKind::Punct("<="),
                TokenKind::Float(2.5),
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn lexes_doubled_quotes() {
        assert_eq!(kinds("'it''s'")[0], TokenKind::Str("it's".to_string()));
        assert_eq!(kinds("\"say \"\"hi\"\"\"")[0], TokenKind::Str("say \"hi\"".to_string()));
    }

    #[test]
    fn precedence_of_arithmetic() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        let Expr::Binary { op, right, .. } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
        let err = parse_expression(&deep).unwrap_err();
        assert_eq!(err.message, "expression is nested too deeply");

        let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse_expression(&shallow).unwrap(), Expr::Literal(Value::Int(1)));
    }

    #[test]
    fn long_chains_count_as_nesting() {
        for source in [
            format!("{}1", "-".repeat(1000)),
            format!("1{}", " + 1".repeat(1000)),
            format!("#a{}", ".b".repeat(1000)),
            format!("#a{}", " ?: #b".repeat(1000)),
        ] {
            assert!(parse_expression(&source).is_err(), "accepted: {source:.20}");
        }
        assert!(parse_expression(&format!("1{}", " + 1".repeat(50))).is_ok());
    }

    #[test]
    fn unterminated_string_reports_column() {
        let err = parse_expression("1 + 'abc").unwrap_err();
        assert_eq!(err.column, 5);
        assert!(err.message.contains("unterminated"));
    }
}
