//! The expression being edited.

use serde::Serialize;

use crate::calculator::is_operator_symbol;

/// Canonical text of an empty expression.
pub const SENTINEL: &str = "0";

/// The live expression, kept as two aligned strings.
///
/// `canonical` is what the evaluator sees and uses `*` and `/`. `rendered`
/// is what the user sees and uses display glyphs for those two operators.
/// Both always have the same number of characters, and an edit to one is
/// mirrored at the same position in the other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpressionState {
    canonical: String,
    rendered: String,
    just_evaluated: bool,
}

impl Default for ExpressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionState {
    pub fn new() -> Self {
        Self {
            canonical: SENTINEL.to_string(),
            rendered: SENTINEL.to_string(),
            just_evaluated: false,
        }
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// True from an evaluation until the next edit command.
    pub fn just_evaluated(&self) -> bool {
        self.just_evaluated
    }

    /// Whether the expression is the empty sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.canonical == SENTINEL
    }

    /// Whether the canonical text ends in an operator.
    pub fn ends_with_operator(&self) -> bool {
        self.canonical.chars().last().is_some_and(is_operator_symbol)
    }

    pub(crate) fn set_just_evaluated(&mut self, value: bool) {
        self.just_evaluated = value;
    }

    /// Empty both strings. Only valid as a step before appending.
    pub(crate) fn clear(&mut self) {
        self.canonical.clear();
        self.rendered.clear();
    }

    pub(crate) fn push(&mut self, symbol: char, glyph: char) {
        self.canonical.push(symbol);
        self.rendered.push(glyph);
    }

    /// Swap the last character of both strings.
    pub(crate) fn replace_last(&mut self, symbol: char, glyph: char) {
        self.canonical.pop();
        self.rendered.pop();
        self.push(symbol, glyph);
    }

    /// Remove the last character, falling back to the sentinel when nothing
    /// is left.
    pub(crate) fn pop(&mut self) {
        self.canonical.pop();
        self.rendered.pop();

        if self.canonical.is_empty() {
            self.reset_text();
        }
    }

    /// Replace the expression with a plain number.
    pub(crate) fn set_number(&mut self, text: &str) {
        self.canonical = text.to_string();
        self.rendered = text.to_string();
    }

    pub(crate) fn reset_text(&mut self) {
        self.set_number(SENTINEL);
    }
}
