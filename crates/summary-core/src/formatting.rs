/// Format a count with thousands separators for log output.
///
/// # Examples
///
/// ```
/// use summary_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// Format a base-currency amount as whole millions, e.g. `"1,235M"`.
///
/// # Examples
///
/// ```
/// use summary_core::formatting::format_millions;
///
/// assert_eq!(format_millions(1_234_600_000.0), "1,235M");
/// assert_eq!(format_millions(-2_000_000.0), "-2M");
/// ```
pub fn format_millions(amount: f64) -> String {
    let millions = crate::units::base_to_rounded_millions(amount);
    if millions < 0 {
        format!("-{}M", group_thousands(&millions.unsigned_abs().to_string()))
    } else {
        format!("{}M", group_thousands(&millions.to_string()))
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
