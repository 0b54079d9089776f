//! Tokens produced by the expression tokenizer.

use std::fmt;

/// One of the four binary operators the calculator understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Map a raw expression character to an operator.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }

    /// The character used for this operator in a canonical expression.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Whether the operator may also act as a unary sign on a number.
    pub fn is_sign(self) -> bool {
        matches!(self, Self::Add | Self::Subtract)
    }

    /// Whether the operator is reduced in the first (multiplicative) pass.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Self::Multiply | Self::Divide)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Check whether a character is one of the four operator symbols.
pub fn is_operator_symbol(c: char) -> bool {
    Operator::from_symbol(c).is_some()
}

/// A token of a canonical expression.
///
/// Numbers are kept as their literal text (digits, at most one dot, optional
/// leading sign) and only parsed when the reducer needs their value.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(String),
    Operator(Operator),
}

impl Token {
    /// Build a number token from a computed value.
    pub fn from_value(value: f64) -> Self {
        Self::Number(value.to_string())
    }

    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            Self::Operator(op) => Some(*op),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(literal) => f.write_str(literal),
            Self::Operator(op) => write!(f, "{}", op),
        }
    }
}
