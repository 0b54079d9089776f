//! The edit buffer: applies edit commands to the live expression and
//! pushes the results to the display sinks.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::calculator::{self, EvalError, Operator, format_chain, format_display};
use crate::display::TextSink;

use super::command::{Command, Digit};
use super::state::ExpressionState;

/// What to do with the expression display when evaluation is requested on
/// an expression that ends in an operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingOperatorPolicy {
    /// Leave the malformed expression visible so it can be corrected.
    #[default]
    Keep,
    /// Blank the expression display.
    Clear,
}

/// Rendering and policy knobs for the edit buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct EditSettings {
    pub multiply_glyph: char,
    pub divide_glyph: char,
    /// Text shown in the result display when evaluation fails.
    pub error_text: String,
    /// Blank the expression display after a successful evaluation instead of
    /// leaving the evaluated expression up until the next edit.
    pub clear_expression_on_success: bool,
    pub trailing_operator: TrailingOperatorPolicy,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            multiply_glyph: '×',
            divide_glyph: '÷',
            error_text: "Error".to_string(),
            clear_expression_on_success: true,
            trailing_operator: TrailingOperatorPolicy::Keep,
        }
    }
}

impl EditSettings {
    /// The character shown to the user for an operator.
    pub fn glyph(&self, op: Operator) -> char {
        match op {
            Operator::Multiply => self.multiply_glyph,
            Operator::Divide => self.divide_glyph,
            Operator::Add | Operator::Subtract => op.symbol(),
        }
    }
}

/// Result of an evaluate command.
///
/// Failures have already been shown as the error text by the time this is
/// returned; it exists for callers that want to log or inspect them.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluateOutcome {
    /// The expression reduced to this value.
    Value(f64),
    /// The expression ends in an operator and was not evaluated.
    TrailingOperator,
    /// The evaluator rejected the expression.
    Failed(EvalError),
    /// There was nothing to evaluate.
    Skipped,
}

impl EvaluateOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::TrailingOperator | Self::Failed(_))
    }
}

/// Owns the expression state and the two display sinks.
pub struct EditBuffer<E, R> {
    state: ExpressionState,
    settings: EditSettings,
    expression_sink: E,
    result_sink: R,
}

impl<E: TextSink, R: TextSink> EditBuffer<E, R> {
    pub fn new(expression_sink: E, result_sink: R) -> Self {
        Self::with_settings(EditSettings::default(), expression_sink, result_sink)
    }

    /// Create a buffer and show the initial expression.
    pub fn with_settings(settings: EditSettings, expression_sink: E, result_sink: R) -> Self {
        let mut buffer = Self {
            state: ExpressionState::new(),
            settings,
            expression_sink,
            result_sink,
        };
        buffer.show_expression();
        buffer.result_sink.show("");
        buffer
    }

    pub fn state(&self) -> &ExpressionState {
        &self.state
    }

    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    pub fn expression_sink(&self) -> &E {
        &self.expression_sink
    }

    pub fn result_sink(&self) -> &R {
        &self.result_sink
    }

    pub fn into_sinks(self) -> (E, R) {
        (self.expression_sink, self.result_sink)
    }

    /// Apply a single edit command.
    pub fn apply(&mut self, command: Command) {
        debug!(%command, expression = self.state.canonical(), "applying command");

        match command {
            Command::Digit(digit) => self.append_digit(digit),
            Command::Decimal => self.append_decimal(),
            Command::Operator(op) => self.append_operator(op),
            Command::Evaluate => {
                self.evaluate();
            }
            Command::DeleteLast => self.delete_last(),
            Command::Reset => self.reset(),
        }
    }

    pub fn append_digit(&mut self, digit: Digit) {
        self.append_digit_or_dot(digit.as_char());
    }

    pub fn append_decimal(&mut self) {
        self.append_digit_or_dot('.');
    }

    /// Append an operator, replacing a trailing operator instead of
    /// stacking a second one.
    pub fn append_operator(&mut self, op: Operator) {
        self.begin_edit(false);

        let glyph = self.settings.glyph(op);
        if self.state.ends_with_operator() {
            self.state.replace_last(op.symbol(), glyph);
        } else {
            self.state.push(op.symbol(), glyph);
        }

        self.show_expression();
    }

    /// Remove the last character. Right after an evaluation this resets
    /// instead of editing the result.
    pub fn delete_last(&mut self) {
        if self.state.just_evaluated() {
            self.reset();
            return;
        }

        self.state.pop();
        self.show_expression();
    }

    pub fn reset(&mut self) {
        self.state.reset_text();
        self.state.set_just_evaluated(false);
        self.show_expression();
        self.result_sink.show("");
    }

    /// Evaluate the expression and show the result.
    ///
    /// On success the expression becomes the plain result so that a following
    /// operator chains from it. Every failure shows the error text; none of
    /// them leave the buffer unusable.
    pub fn evaluate(&mut self) -> EvaluateOutcome {
        if self.state.canonical().is_empty() {
            return EvaluateOutcome::Skipped;
        }

        if self.state.ends_with_operator() {
            debug!(expression = self.state.canonical(), "expression ends with operator");
            self.fail();
            if self.settings.trailing_operator == TrailingOperatorPolicy::Clear {
                self.expression_sink.show("");
            }
            return EvaluateOutcome::TrailingOperator;
        }

        match calculator::evaluate(self.state.canonical()) {
            Ok(value) => {
                if self.settings.clear_expression_on_success {
                    self.expression_sink.show("");
                }
                self.result_sink.show(&format_display(value));
                self.state.set_number(&format_chain(value));
                self.state.set_just_evaluated(true);
                debug!(value, "evaluated");
                EvaluateOutcome::Value(value)
            }
            Err(err) => {
                warn!(expression = self.state.canonical(), error = %err, "evaluation failed");
                self.fail();
                EvaluateOutcome::Failed(err)
            }
        }
    }

    fn append_digit_or_dot(&mut self, symbol: char) {
        let is_digit = symbol.is_ascii_digit();
        self.begin_edit(is_digit);

        // No leading zeros, except in front of a decimal point.
        if is_digit && self.state.is_sentinel() {
            self.state.clear();
        }

        self.state.push(symbol, symbol);
        self.show_expression();
    }

    /// Leave the just-evaluated mode before an edit. A digit starts a new
    /// expression; anything else continues from the previous result.
    fn begin_edit(&mut self, starts_number: bool) {
        if !self.state.just_evaluated() {
            return;
        }

        if starts_number {
            self.state.clear();
            self.result_sink.show("");
        }
        self.expression_sink.show("");
        self.state.set_just_evaluated(false);
    }

    fn fail(&mut self) {
        self.result_sink.show(&self.settings.error_text);
        self.state.set_just_evaluated(true);
    }

    fn show_expression(&mut self) {
        self.expression_sink.show(self.state.rendered());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingSink;

    type TestBuffer = EditBuffer<RecordingSink, RecordingSink>;

    fn buffer() -> TestBuffer {
        EditBuffer::new(RecordingSink::new(), RecordingSink::new())
    }

    fn buffer_with(settings: EditSettings) -> TestBuffer {
        EditBuffer::with_settings(settings, RecordingSink::new(), RecordingSink::new())
    }

    fn type_keys(buffer: &mut TestBuffer, keys: &str) {
        for c in keys.chars() {
            let command = match c {
                '.' => Command::Decimal,
                '=' => Command::Evaluate,
                '<' => Command::DeleteLast,
                'c' => Command::Reset,
                _ => match Operator::from_symbol(c) {
                    Some(op) => Command::Operator(op),
                    None => Command::Digit(Digit::try_from(c).unwrap()),
                },
            };
            buffer.apply(command);
        }
    }

    fn expression(buffer: &TestBuffer) -> &str {
        buffer.expression_sink().current()
    }

    fn result(buffer: &TestBuffer) -> &str {
        buffer.result_sink().current()
    }

    #[test]
    fn test_initial_display() {
        let buffer = buffer();
        assert_eq!(expression(&buffer), "0");
        assert_eq!(result(&buffer), "");
        assert_eq!(buffer.state().canonical(), "0");
    }

    #[test]
    fn test_leading_zero_suppressed() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "05");
        assert_eq!(buffer.state().canonical(), "5");
        assert_eq!(expression(&buffer), "5");
    }

    #[test]
    fn test_zero_kept_before_decimal_point() {
        let mut buffer = buffer();
        type_keys(&mut buffer, ".5");
        assert_eq!(buffer.state().canonical(), "0.5");
    }

    #[test]
    fn test_glyphs_in_rendered_text() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "6*2/3");
        assert_eq!(buffer.state().canonical(), "6*2/3");
        assert_eq!(buffer.state().rendered(), "6×2÷3");
        assert_eq!(expression(&buffer), "6×2÷3");
    }

    #[test]
    fn test_operator_replacement() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "5+*");
        assert_eq!(buffer.state().canonical(), "5*");
        assert_eq!(buffer.state().rendered(), "5×");

        type_keys(&mut buffer, "-");
        assert_eq!(buffer.state().canonical(), "5-");
    }

    #[test]
    fn test_operator_after_sentinel() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "-3=");
        assert_eq!(result(&buffer), "-3");
    }

    #[test]
    fn test_evaluate_simple() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "2+3*4");
        assert_eq!(buffer.evaluate(), EvaluateOutcome::Value(14.0));
        assert_eq!(result(&buffer), "14");
        assert_eq!(expression(&buffer), "");
        assert_eq!(buffer.state().canonical(), "14");
        assert!(buffer.state().just_evaluated());
    }

    #[test]
    fn test_division_result_display() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "10/3=");
        assert_eq!(result(&buffer), "3.333333");
        assert_eq!(buffer.state().canonical(), "3.3333333333333335");
    }

    #[test]
    fn test_division_by_zero_is_zero() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "10/0");
        assert_eq!(buffer.evaluate(), EvaluateOutcome::Value(0.0));
        assert_eq!(result(&buffer), "0");
    }

    #[test]
    fn test_chaining_from_result() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "3+4=");
        assert_eq!(result(&buffer), "7");

        type_keys(&mut buffer, "+");
        assert_eq!(buffer.state().canonical(), "7+");
        assert_eq!(expression(&buffer), "7+");
        assert!(!buffer.state().just_evaluated());
        // The previous result stays visible while chaining.
        assert_eq!(result(&buffer), "7");

        type_keys(&mut buffer, "3=");
        assert_eq!(result(&buffer), "10");
    }

    #[test]
    fn test_chaining_negative_result() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "2-6=*3=");
        assert_eq!(result(&buffer), "-12");
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "3+4=");
        type_keys(&mut buffer, "9");
        assert_eq!(buffer.state().canonical(), "9");
        assert_eq!(expression(&buffer), "9");
        assert_eq!(result(&buffer), "");
    }

    #[test]
    fn test_decimal_after_result_continues() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "3+4=.");
        assert_eq!(buffer.state().canonical(), "7.");
    }

    #[test]
    fn test_trailing_operator_is_error() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "5+");
        assert_eq!(buffer.evaluate(), EvaluateOutcome::TrailingOperator);
        assert_eq!(result(&buffer), "Error");
        assert!(buffer.state().just_evaluated());
        // The malformed text stays up for correction.
        assert_eq!(buffer.state().canonical(), "5+");
        assert_eq!(expression(&buffer), "5+");
    }

    #[test]
    fn test_trailing_operator_clear_policy() {
        let settings = EditSettings {
            trailing_operator: TrailingOperatorPolicy::Clear,
            ..EditSettings::default()
        };
        let mut buffer = buffer_with(settings);
        type_keys(&mut buffer, "5*=");
        assert_eq!(result(&buffer), "Error");
        assert_eq!(expression(&buffer), "");
        assert!(buffer.state().just_evaluated());
    }

    #[test]
    fn test_recovery_after_error() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "5+=");
        assert_eq!(result(&buffer), "Error");

        // An operator continues the corrected expression.
        type_keys(&mut buffer, "-2=");
        assert_eq!(result(&buffer), "3");

        type_keys(&mut buffer, "8+=9");
        assert_eq!(buffer.state().canonical(), "9");
        assert_eq!(result(&buffer), "");
    }

    #[test]
    fn test_multiple_dots_fail_at_evaluation() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "1.2.3");
        assert_eq!(buffer.state().canonical(), "1.2.3");

        let outcome = buffer.evaluate();
        assert!(matches!(outcome, EvaluateOutcome::Failed(ref e) if e.is_malformed()));
        assert!(outcome.is_error());
        assert_eq!(result(&buffer), "Error");
        assert!(buffer.state().just_evaluated());
    }

    #[test]
    fn test_overflow_shows_error() {
        let big = format!("1{}", "0".repeat(308));
        let mut buffer = buffer();
        type_keys(&mut buffer, &format!("{big}*{big}"));

        let outcome = buffer.evaluate();
        assert_eq!(outcome, EvaluateOutcome::Failed(EvalError::Overflow));
        assert_eq!(result(&buffer), "Error");
        assert!(buffer.state().just_evaluated());
        assert_eq!(buffer.state().canonical(), format!("{big}*{big}"));
        assert!(!buffer.state().canonical().contains("inf"));
    }

    #[test]
    fn test_nan_result_shows_error() {
        let big = format!("1{}", "0".repeat(308));
        let mut buffer = buffer();
        type_keys(&mut buffer, &format!("{big}*{big}*0"));

        assert_eq!(buffer.evaluate(), EvaluateOutcome::Failed(EvalError::Overflow));
        assert_eq!(result(&buffer), "Error");
        assert!(buffer.state().just_evaluated());
        let canonical = buffer.state().canonical().to_ascii_lowercase();
        assert!(!canonical.contains("nan") && !canonical.contains("inf"));

        // The session is still usable.
        type_keys(&mut buffer, "2*3=");
        assert_eq!(result(&buffer), "6");
    }

    #[test]
    fn test_delete_last() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "12*");
        type_keys(&mut buffer, "<");
        assert_eq!(buffer.state().canonical(), "12");
        assert_eq!(expression(&buffer), "12");
    }

    #[test]
    fn test_delete_to_sentinel() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "4*5");
        for _ in 0..10 {
            type_keys(&mut buffer, "<");
            assert!(!buffer.state().canonical().is_empty());
        }
        assert_eq!(buffer.state().canonical(), "0");
        assert_eq!(expression(&buffer), "0");
    }

    #[test]
    fn test_delete_after_result_resets() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "3+4=<");
        assert_eq!(buffer.state(), &ExpressionState::new());
        assert_eq!(expression(&buffer), "0");
        assert_eq!(result(&buffer), "");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut buffer = buffer();
        type_keys(&mut buffer, "3+4=5*");

        buffer.reset();
        let once = buffer.state().clone();
        buffer.reset();
        assert_eq!(buffer.state(), &once);
        assert_eq!(once, ExpressionState::new());
        assert_eq!(expression(&buffer), "0");
        assert_eq!(result(&buffer), "");
    }

    #[test]
    fn test_stale_expression_setting() {
        let settings = EditSettings {
            clear_expression_on_success: false,
            ..EditSettings::default()
        };
        let mut buffer = buffer_with(settings);
        type_keys(&mut buffer, "2*3=");
        assert_eq!(expression(&buffer), "2×3");
        assert_eq!(result(&buffer), "6");

        type_keys(&mut buffer, "+");
        assert_eq!(expression(&buffer), "6+");
    }

    #[test]
    fn test_custom_glyphs() {
        let settings = EditSettings {
            multiply_glyph: 'x',
            divide_glyph: ':',
            ..EditSettings::default()
        };
        let mut buffer = buffer_with(settings);
        type_keys(&mut buffer, "8/2*3");
        assert_eq!(expression(&buffer), "8:2x3");
        assert_eq!(buffer.state().canonical(), "8/2*3");
    }
}
