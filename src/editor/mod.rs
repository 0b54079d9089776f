//! Expression editing driven by discrete key commands.

mod buffer;
mod command;
mod state;

pub use buffer::{EditBuffer, EditSettings, EvaluateOutcome, TrailingOperatorPolicy};
pub use command::{Command, Digit};
pub use state::{ExpressionState, SENTINEL};
