//! A keystroke-driven four-function calculator.
//!
//! Key presses become [`editor::Command`]s, which an [`editor::EditBuffer`]
//! applies to a live expression. Evaluation reduces the expression with
//! multiplication and division ahead of addition and subtraction, and the
//! buffer pushes the expression and result to two [`display::TextSink`]s.

pub mod calculator;
pub mod config;
pub mod display;
pub mod editor;
pub mod input;
