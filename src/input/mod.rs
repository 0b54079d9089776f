//! Input side: turning key text into commands and delivering them to the
//! edit buffer one at a time.

mod keymap;
mod queue;

pub use keymap::{KeyError, command_for_char, command_for_name, parse_keys};
pub use queue::{CommandQueue, CommandSender, QueueClosed};
