//! Display formatting for feed prices.
//!
//! BTMC quotes are shown as whole units with `,` thousands separators,
//! e.g. `17800000.0` renders as `17,800,000`.

/// Round `value` to zero decimal places and group the integer digits in threes.
///
/// Rounding is done by the standard `{:.0}` formatter. Negative values keep
/// their sign unless they round to zero.
///
/// ```
/// use bullion_rust_core::utils::format::format_grouped;
///
/// assert_eq!(format_grouped(17_800_000.0), "17,800,000");
/// assert_eq!(format_grouped(-1234.4), "-1,234");
/// ```
pub fn format_grouped(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (negative, digits) = match rounded.strip_prefix('-') {
        Some(rest) => (rest.bytes().any(|b| b != b'0'), rest),
        None => (false, rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
