//! Mapping of typed key text to edit commands.
//!
//! Plain characters map one-to-one (`0`-`9`, `.`, `+`, `-`, `*`, `/`, `=`).
//! Keys without a printable character are written as bracketed names such
//! as `<bs>` or `<esc>`.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::calculator::Operator;
use crate::editor::{Command, Digit};

lazy_static! {
    /// Matches a bracketed key name at the start of the input.
    static ref NAMED_KEY: Regex = Regex::new(r"^<([A-Za-z]+)>").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("unknown key `{key}` at offset {offset}")]
    UnknownKey { key: char, offset: usize },

    #[error("unknown key name `<{name}>` at offset {offset}")]
    UnknownName { name: String, offset: usize },
}

impl KeyError {
    /// Byte offset of the offending key in the input.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnknownKey { offset, .. } | Self::UnknownName { offset, .. } => *offset,
        }
    }
}

/// Command for a single printable key.
pub fn command_for_char(c: char) -> Option<Command> {
    match c {
        '.' => Some(Command::Decimal),
        '=' | '\n' | '\r' => Some(Command::Evaluate),
        'x' | 'X' | '×' => Some(Command::Operator(Operator::Multiply)),
        '÷' => Some(Command::Operator(Operator::Divide)),
        _ => Operator::from_symbol(c)
            .map(Command::Operator)
            .or_else(|| Digit::try_from(c).ok().map(Command::Digit)),
    }
}

/// Command for a named key, matched case-insensitively.
pub fn command_for_name(name: &str) -> Option<Command> {
    match name.to_ascii_lowercase().as_str() {
        "enter" | "return" | "eq" | "equals" => Some(Command::Evaluate),
        "bs" | "backspace" => Some(Command::DeleteLast),
        "esc" | "escape" | "del" | "delete" | "c" => Some(Command::Reset),
        _ => None,
    }
}

/// Parse a run of typed keys into commands, one per key.
///
/// Whitespace separates nothing and is skipped.
pub fn parse_keys(text: &str) -> Result<Vec<Command>, KeyError> {
    let mut commands = Vec::new();
    let mut offset = 0;

    while let Some(c) = text[offset..].chars().next() {
        if c == '<'
            && let Some(captures) = NAMED_KEY.captures(&text[offset..])
        {
            let name = &captures[1];
            let command = command_for_name(name).ok_or_else(|| KeyError::UnknownName {
                name: name.to_string(),
                offset,
            })?;
            commands.push(command);
            offset += captures[0].len();
            continue;
        }

        if !matches!(c, ' ' | '\t') {
            let command = command_for_char(c).ok_or(KeyError::UnknownKey { key: c, offset })?;
            commands.push(command);
        }
        offset += c.len_utf8();
    }

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(n: u8) -> Command {
        Command::digit(n).unwrap()
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            parse_keys("12+3=").unwrap(),
            vec![
                digit(1),
                digit(2),
                Command::Operator(Operator::Add),
                digit(3),
                Command::Evaluate
            ]
        );
    }

    #[test]
    fn test_operator_aliases() {
        let ops = parse_keys("*x×/÷-").unwrap();
        assert_eq!(
            ops,
            vec![
                Command::Operator(Operator::Multiply),
                Command::Operator(Operator::Multiply),
                Command::Operator(Operator::Multiply),
                Command::Operator(Operator::Divide),
                Command::Operator(Operator::Divide),
                Command::Operator(Operator::Subtract),
            ]
        );
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(
            parse_keys("<BS><esc><Enter><del>").unwrap(),
            vec![
                Command::DeleteLast,
                Command::Reset,
                Command::Evaluate,
                Command::Reset
            ]
        );
    }

    #[test]
    fn test_whitespace_ignored() {
        assert_eq!(parse_keys(" 1 + 2 ").unwrap().len(), 3);
        assert!(parse_keys("").unwrap().is_empty());
    }

    #[test]
    fn test_newline_evaluates() {
        assert_eq!(parse_keys("7\n").unwrap(), vec![digit(7), Command::Evaluate]);
    }

    #[test]
    fn test_unknown_key() {
        let err = parse_keys("12a").unwrap_err();
        assert_eq!(err, KeyError::UnknownKey { key: 'a', offset: 2 });
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn test_unknown_name() {
        let err = parse_keys("1<tab>").unwrap_err();
        assert_eq!(
            err,
            KeyError::UnknownName {
                name: "tab".to_string(),
                offset: 1
            }
        );
    }

    #[test]
    fn test_unclosed_bracket() {
        assert_eq!(
            parse_keys("<bs").unwrap_err(),
            KeyError::UnknownKey { key: '<', offset: 0 }
        );
    }

    #[test]
    fn test_offsets_count_bytes() {
        let err = parse_keys("×q").unwrap_err();
        assert_eq!(err.offset(), '×'.len_utf8());
    }
}
