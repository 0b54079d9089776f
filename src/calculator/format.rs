//! Formatting of evaluation results.

/// Fractional remainders smaller than this are displayed as integers.
const INTEGER_EPSILON: f64 = 1e-6;

/// Number of fractional digits shown for non-integer results.
const DISPLAY_DECIMALS: usize = 6;

/// Format a result for the result display.
///
/// Values whose fractional part is within `1e-6` of zero are shown as the
/// truncated integer. Everything else is rounded to six decimal places with
/// trailing zeros removed.
pub fn format_display(value: f64) -> String {
    if (value % 1.0).abs() < INTEGER_EPSILON {
        return integer_string(value.trunc());
    }

    let formatted = format!("{:.*}", DISPLAY_DECIMALS, value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    match trimmed {
        "-0" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

/// Format a result as the canonical text a new expression can chain from.
///
/// This is the plain shortest round-trip decimal, never scientific notation.
pub fn format_chain(value: f64) -> String {
    // Adding positive zero turns -0.0 into 0.0.
    (value + 0.0).to_string()
}

fn integer_string(truncated: f64) -> String {
    if truncated == 0.0 {
        "0".to_string()
    } else {
        truncated.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_results() {
        assert_eq!(format_display(5.0), "5");
        assert_eq!(format_display(-12.0), "-12");
        assert_eq!(format_display(0.0), "0");
        assert_eq!(format_display(-0.0), "0");
        assert_eq!(format_display(1e20), "100000000000000000000");
    }

    #[test]
    fn test_near_integer_is_truncated() {
        assert_eq!(format_display(7.0000004), "7");
        assert_eq!(format_display(-3.0000002), "-3");
    }

    #[test]
    fn test_just_below_integer_rounds() {
        assert_eq!(format_display(2.9999999), "3");
    }

    #[test]
    fn test_fractional_results() {
        assert_eq!(format_display(10.0 / 3.0), "3.333333");
        assert_eq!(format_display(2.0 / 3.0), "0.666667");
        assert_eq!(format_display(0.5), "0.5");
        assert_eq!(format_display(-1.25), "-1.25");
    }

    #[test]
    fn test_chain_form() {
        assert_eq!(format_chain(7.0), "7");
        assert_eq!(format_chain(-4.5), "-4.5");
        assert_eq!(format_chain(-0.0), "0");
        assert_eq!(format_chain(10.0 / 3.0), "3.3333333333333335");
    }
}
