//! Coordinate text formatting.
//!
//! [`format`] normalizes committed coordinate text to at most five fractional
//! digits. It is a pure function: the same input always yields the same output
//! and any output is a fixed point (`format(format(s)) == format(s)`).
//!
//! Rounding works on the decimal digits as written rather than on a binary
//! float, so `"0.123455"` rounds up to `"0.12346"` instead of drifting to
//! `"0.12345"` through representation error.

/// Number of fractional digits kept by [`format`].
pub const PRECISION: usize = 5;

/// Normalizes raw coordinate text.
///
/// - Unparseable input (including the empty string) yields `""`.
/// - Input with five or fewer fractional digits is returned unchanged.
/// - Longer fractions are rounded half away from zero to five digits. When the
///   rounding carries out of the fraction, the integer part grows by one in
///   magnitude, keeping its sign, and the fraction becomes `00000`.
///
/// # Examples
///
/// ```
/// use geoform::domain::format::format;
///
/// assert_eq!(format("42.123456"), "42.12346");
/// assert_eq!(format("-3.999996"), "-4.00000");
/// assert_eq!(format("5.3876"), "5.3876");
/// assert_eq!(format("north"), "");
/// ```
#[must_use]
pub fn format(raw: &str) -> String {
    let raw = raw.trim();
    if !is_decimal(raw) {
        return String::new();
    }

    let Some((integer, fraction)) = raw.split_once('.') else {
        return raw.to_string();
    };

    if fraction.len() <= PRECISION {
        return raw.to_string();
    }

    let kept = &fraction[..PRECISION];
    let round_up = fraction.as_bytes()[PRECISION] >= b'5';

    if !round_up {
        return format!("{integer}.{kept}");
    }

    match increment_digits(kept) {
        Some(rounded) => format!("{integer}.{rounded}"),
        None => {
            let (sign, magnitude) = integer
                .strip_prefix('-')
                .map_or(("", integer), |digits| ("-", digits));
            let magnitude = if magnitude.is_empty() { "0" } else { magnitude };
            let carried = increment_digits(magnitude)
                .unwrap_or_else(|| format!("1{}", "0".repeat(magnitude.len())));
            format!("{sign}{carried}.{}", "0".repeat(PRECISION))
        }
    }
}

/// Whether two texts denote the same value once formatted.
///
/// `"5.3876"` and `"5.387600001"` are equivalent even though their formatted
/// texts differ in trailing zeros. Texts that do not format to a number are
/// compared as formatted strings.
#[must_use]
pub fn equivalent(a: &str, b: &str) -> bool {
    let (a, b) = (format(a), format(b));
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

/// Accepts `-?digits(.digits)?` with at least one digit overall.
///
/// Exponents, `inf`, `NaN` and signs other than a leading minus are rejected so
/// that the fraction split in [`format`] always sees plain digits.
fn is_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    !(integer.is_empty() && fraction.is_empty())
        && all_digits(integer)
        && all_digits(fraction)
        && unsigned.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Adds one to a string of decimal digits, keeping its width.
///
/// Returns `None` when the addition overflows the width (all nines).
fn increment_digits(digits: &str) -> Option<String> {
    let mut bytes = digits.as_bytes().to_vec();
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8(bytes).ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_mid_range_fraction() {
        assert_eq!(format("42.123456"), "42.12346");
        assert_eq!(format("12.123459"), "12.12346");
        assert_eq!(format("12.123454"), "12.12345");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format("0.123455"), "0.12346");
        assert_eq!(format("-0.123455"), "-0.12346");
        assert_eq!(format("1.0000050"), "1.00001");
    }

    #[test]
    fn carries_into_integer_part() {
        assert_eq!(format("41.999996"), "42.00000");
        assert_eq!(format("9.999995"), "10.00000");
        assert_eq!(format("179.9999999"), "180.00000");
    }

    #[test]
    fn carry_preserves_negative_sign() {
        assert_eq!(format("-3.999996"), "-4.00000");
        assert_eq!(format("-0.999995"), "-1.00000");
        assert_eq!(format("-99.9999951"), "-100.00000");
    }

    #[test]
    fn short_fractions_are_unchanged() {
        assert_eq!(format("5.3876"), "5.3876");
        assert_eq!(format("52.15610"), "52.15610");
        assert_eq!(format("-180"), "-180");
        assert_eq!(format("7."), "7.");
    }

    #[test]
    fn non_numeric_input_clears() {
        for raw in ["", "   ", "abc", "1,5", "1.2.3", "--1", "+1", "1e5", "inf", "NaN", "-", "."] {
            assert_eq!(format(raw), "", "input {raw:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_dropped() {
        assert_eq!(format(" 5.12 "), "5.12");
    }

    #[test]
    fn format_is_idempotent() {
        let samples = [
            "42.123456", "-3.999996", "0.999995", "5.3876", "abc", "", "-0.0000049", ".123456", "12",
            "179.9999999", "-89.12345678",
        ];
        for raw in samples {
            let once = format(raw);
            assert_eq!(format(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn equivalence_ignores_trailing_zeros_and_noise() {
        assert!(equivalent("5.3876", "5.387600001"));
        assert!(equivalent("52.15610", "52.1561"));
        assert!(equivalent("", "north"));
        assert!(!equivalent("5.3876", "5.3877"));
        assert!(!equivalent("5.3876", ""));
    }

    #[test]
    fn leading_dot_carry_gets_integer_digit() {
        assert_eq!(format(".999999"), "1.00000");
        assert_eq!(format(".123456"), ".12346");
    }
}
