//! Expression tokenizing and evaluation.
//!
//! Expressions are flat sequences of numbers and the four binary operators.
//! Evaluation runs two left-to-right passes over the token list: the first
//! reduces every `*` and `/`, the second folds the remaining `+` and `-`.
//! There are no parentheses and no other precedence levels.

use thiserror::Error;

use super::token::{Operator, Token, is_operator_symbol};

/// Divisors with a magnitude below this are treated as zero, and dividing by
/// them yields zero instead of an infinity.
pub const DIVISOR_EPSILON: f64 = 1e-6;

/// Reasons an expression could not be reduced to a number.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("expression is empty")]
    Empty,

    #[error("operator `{0}` is missing an operand")]
    MissingOperand(Operator),

    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),

    #[error("unexpected character `{0}` in expression")]
    UnexpectedCharacter(char),

    #[error("number `{0}` is not preceded by an operator")]
    UnexpectedNumber(String),

    #[error("result is out of range")]
    Overflow,
}

impl EvalError {
    /// Whether this error comes from the expression text itself rather than
    /// from the magnitude of the result.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Overflow)
    }
}

/// Split a canonical expression into number and operator tokens.
///
/// A `+` or `-` at the start of the expression, or directly after another
/// operator, is a sign and becomes part of the following number. `*` and `/`
/// are always operators.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut number = String::new();
    let mut previous: Option<char> = None;

    for c in expr.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
        } else if let Some(op) = Operator::from_symbol(c) {
            let after_operator = previous.is_none_or(is_operator_symbol);
            if op.is_sign() && after_operator {
                number.push(c);
            } else {
                if !number.is_empty() {
                    tokens.push(Token::Number(std::mem::take(&mut number)));
                }
                tokens.push(Token::Operator(op));
            }
        } else {
            return Err(EvalError::UnexpectedCharacter(c));
        }
        previous = Some(c);
    }

    if !number.is_empty() {
        tokens.push(Token::Number(number));
    }

    Ok(tokens)
}

/// Reduce a token list to a single value.
pub fn reduce(mut tokens: Vec<Token>) -> Result<f64, EvalError> {
    reduce_multiplicative(&mut tokens)?;
    let result = fold_additive(&tokens)?;

    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::Overflow)
    }
}

/// Tokenize and reduce an expression.
pub fn evaluate(expr: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(expr)?;
    tracing::debug!(expression = expr, tokens = tokens.len(), "evaluating");
    reduce(tokens)
}

/// First pass: replace every `a * b` and `a / b` triple with its value,
/// scanning left to right.
fn reduce_multiplicative(tokens: &mut Vec<Token>) -> Result<(), EvalError> {
    let mut i = 0;

    while i < tokens.len() {
        let op = match tokens[i].as_operator() {
            Some(op) if op.is_multiplicative() => op,
            _ => {
                i += 1;
                continue;
            }
        };

        if i == 0 || i + 1 == tokens.len() {
            return Err(EvalError::MissingOperand(op));
        }

        let left = operand(&tokens[i - 1], op)?;
        let right = operand(&tokens[i + 1], op)?;

        let value = if op == Operator::Multiply {
            left * right
        } else if right.abs() < DIVISOR_EPSILON {
            0.0
        } else {
            left / right
        };

        // The result lands at i - 1, so the next unvisited token is at i.
        tokens[i - 1] = Token::from_value(value);
        tokens.drain(i..=i + 1);
    }

    Ok(())
}

/// Second pass: left fold over `n (op n)*` where every op is `+` or `-`.
fn fold_additive(tokens: &[Token]) -> Result<f64, EvalError> {
    let mut iter = tokens.iter();

    let mut result = match iter.next() {
        Some(Token::Number(literal)) => parse_number(literal)?,
        Some(Token::Operator(op)) => return Err(EvalError::MissingOperand(*op)),
        None => return Err(EvalError::Empty),
    };

    while let Some(token) = iter.next() {
        let op = match token {
            Token::Operator(op) => *op,
            Token::Number(literal) => return Err(EvalError::UnexpectedNumber(literal.clone())),
        };

        let next = match iter.next() {
            Some(token) => operand(token, op)?,
            None => return Err(EvalError::MissingOperand(op)),
        };

        match op {
            Operator::Add => result += next,
            Operator::Subtract => result -= next,
            // Pass one leaves none of these behind.
            Operator::Multiply | Operator::Divide => return Err(EvalError::MissingOperand(op)),
        }
    }

    Ok(result)
}

fn operand(token: &Token, op: Operator) -> Result<f64, EvalError> {
    match token {
        Token::Number(literal) => parse_number(literal),
        Token::Operator(_) => Err(EvalError::MissingOperand(op)),
    }
}

fn parse_number(literal: &str) -> Result<f64, EvalError> {
    literal
        .parse::<f64>()
        .map_err(|_| EvalError::InvalidNumber(literal.to_string()))
}
