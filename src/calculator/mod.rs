//! Calculator core: tokenizing, evaluating and formatting expressions.
//!
//! This module provides functionality to:
//! - Split a canonical expression into tokens
//! - Reduce tokens to a value (multiply/divide first, then add/subtract)
//! - Format values for display and for chaining
//! - Copy results to the clipboard

mod clipboard;
mod evaluation;
mod format;
mod token;

pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use evaluation::{DIVISOR_EPSILON, EvalError, evaluate, reduce, tokenize};
pub use format::{format_chain, format_display};
pub use token::{Operator, Token, is_operator_symbol};
