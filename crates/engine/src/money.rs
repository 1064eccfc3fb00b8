//! Helpers for entry amounts.
//!
//! Amounts are plain `f64` values without a currency unit. Input text that
//! does not parse is coerced to `NaN` and kept: a single bad amount makes the
//! collection total `NaN` until the entry is fixed or removed.

/// Rounds a value to cents, half away from zero.
///
/// Computed as `(value * 100).round() / 100`, so binary floating point
/// artifacts on some cent boundaries are kept as they are.
///
/// ```rust
/// use engine::round_cents;
///
/// assert_eq!(round_cents(0.1 + 0.2), 0.3);
/// assert_eq!(round_cents(-0.125), -0.13);
/// assert!(round_cents(f64::NAN).is_nan());
///
/// // 1.005 is stored as 1.00499..., so it rounds down.
/// assert_eq!(round_cents(1.005), 1.0);
/// ```
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coerces user text into an amount.
///
/// Leading and trailing whitespace is ignored. Empty or non-numeric text
/// becomes `NaN`; it is never rejected. Spelled-out infinities (`inf`,
/// `-Infinity`) and literals too large for an `f64` (`1e400`) also become
/// `NaN`, so an amount is always either finite or `NaN`.
///
/// ```rust
/// use engine::parse_amount;
///
/// assert_eq!(parse_amount(" 12.5 "), 12.5);
/// assert_eq!(parse_amount("-3"), -3.0);
/// assert!(parse_amount("twelve").is_nan());
/// assert!(parse_amount("").is_nan());
/// assert!(parse_amount("inf").is_nan());
/// assert!(parse_amount("1e400").is_nan());
/// ```
#[must_use]
pub fn parse_amount(text: &str) -> f64 {
    finite_or_nan(text.trim().parse::<f64>().unwrap_or(f64::NAN))
}

/// Keeps finite values, maps infinities to `NaN`.
///
/// Stores write non-finite amounts as `null` and read them back as `NaN`;
/// normalizing up front keeps an amount the same across a reload.
#[must_use]
pub fn finite_or_nan(value: f64) -> f64 {
    if value.is_finite() { value } else { f64::NAN }
}

/// Formats an amount with exactly two decimals.
///
/// Non-finite values render as `NaN`, the value they reload as; negative
/// zero renders as `0.00`.
#[must_use]
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

/// Sums amounts and rounds the result to cents.
pub(crate) fn rounded_sum<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    round_cents(amounts.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_cents_keeps_two_decimals() {
        assert_eq!(round_cents(10.0), 10.0);
        assert_eq!(round_cents(12.344), 12.34);
        assert_eq!(round_cents(12.346), 12.35);
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(-0.125), -0.13);
    }

    #[test]
    fn parse_amount_coerces_garbage_to_nan() {
        assert_eq!(parse_amount("10"), 10.0);
        assert_eq!(parse_amount("2.99"), 2.99);
        assert!(parse_amount("1,50").is_nan());
        assert!(parse_amount("12abc").is_nan());
        assert!(parse_amount("   ").is_nan());
    }

    #[test]
    fn parse_amount_never_yields_infinity() {
        for text in ["inf", "-inf", "infinity", "-Infinity", "INF", "+inf", "NaN", "-nan", "1e400", "-1e400"] {
            assert!(parse_amount(text).is_nan(), "{text} was not coerced");
        }
        assert_eq!(parse_amount("1e300"), 1e300);
    }

    #[test]
    fn non_finite_amounts_render_as_nan() {
        assert_eq!(format_amount(f64::INFINITY), "NaN");
        assert_eq!(format_amount(f64::NEG_INFINITY), "NaN");
        assert!(finite_or_nan(f64::INFINITY).is_nan());
        assert_eq!(finite_or_nan(-2.5), -2.5);
    }

    #[test]
    fn format_amount_uses_two_decimals() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(2.5), "2.50");
        assert_eq!(format_amount(-10.1), "-10.10");
        assert_eq!(format_amount(f64::NAN), "NaN");
    }

    #[test]
    fn rounded_sum_propagates_nan() {
        assert_eq!(rounded_sum([0.1, 0.2]), 0.3);
        assert_eq!(rounded_sum(Vec::<f64>::new()), 0.0);
        assert!(rounded_sum([1.0, f64::NAN]).is_nan());
    }
}
