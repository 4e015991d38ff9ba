//! Number text helpers.

/// Number of decimal places kept by [`format_numeric`].
const DISPLAY_DECIMALS: usize = 4;

/// Formats a number for terminal display, rounded to four decimals and
/// without trailing zeros.
///
/// Not for persistence: rounding loses precision.
///
/// # Examples
///
/// ```
/// use survey_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(2.0 / 3.0), "0.6667");
/// ```
pub fn format_numeric(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let s = format!("{:.*}", DISPLAY_DECIMALS, v);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
