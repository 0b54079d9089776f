//! Edit commands accepted by the edit buffer.

use std::fmt;

use crate::calculator::Operator;

/// A decimal digit, 0 through 9.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<char> for Digit {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10)
            .and_then(|d| Digit::new(d as u8))
            .ok_or(c)
    }
}

/// One logical user action.
///
/// The input source emits exactly one command per key press; repeats from a
/// held key are filtered before they get here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Digit(Digit),
    Decimal,
    Operator(Operator),
    Evaluate,
    DeleteLast,
    Reset,
}

impl Command {
    /// Command for a digit value, if it is in range.
    pub fn digit(value: u8) -> Option<Self> {
        Digit::new(value).map(Self::Digit)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "digit {}", d.value()),
            Self::Decimal => f.write_str("decimal"),
            Self::Operator(op) => write!(f, "operator {}", op),
            Self::Evaluate => f.write_str("evaluate"),
            Self::DeleteLast => f.write_str("delete last"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

impl From<Digit> for Command {
    fn from(digit: Digit) -> Self {
        Self::Digit(digit)
    }
}

impl From<Operator> for Command {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_range() {
        assert_eq!(Digit::new(9).map(Digit::value), Some(9));
        assert_eq!(Digit::new(10), None);
        assert_eq!(Command::digit(3), Some(Command::Digit(Digit(3))));
        assert_eq!(Command::digit(12), None);
    }

    #[test]
    fn test_digit_from_char() {
        assert_eq!(Digit::try_from('7').map(Digit::as_char), Ok('7'));
        assert_eq!(Digit::try_from('0').map(Digit::value), Ok(0));
        assert_eq!(Digit::try_from('a'), Err('a'));
        assert_eq!(Digit::try_from('.'), Err('.'));
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::from(Operator::Divide).to_string(), "operator /");
        assert_eq!(Command::DeleteLast.to_string(), "delete last");
    }
}
