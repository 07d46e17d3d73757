//! Number formatting for the text report.

/// Formats a count with comma separators for thousands.
///
/// # Examples
///
/// ```
/// use blux_audit_tools::utils::format::format_number;
///
/// assert_eq!(format_number(1234), "1,234");
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Formats a latency in milliseconds with one decimal place.
pub fn format_millis(ms: f64) -> String {
    format!("{:.1}", ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(12), "12");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(12345), "12,345");
        assert_eq!(format_number(123_456), "123,456");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(1_000_000_000), "1,000,000,000");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(42.0), "42.0");
        assert_eq!(format_millis(12.345), "12.3");
        assert_eq!(format_millis(0.0), "0.0");
    }
}
