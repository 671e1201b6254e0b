//! Number formatting for display
//!
//! Values below 1000 are shown as whole numbers. Larger values are scaled by
//! powers of 1000 and suffixed (K, M, B, T) with two decimals, where a
//! trailing `.00` or `.0` is dropped.

/// Suffix for each power of 1000
const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Format a currency amount for display
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "0".to_string();
    }
    if n < 1000.0 {
        return whole(n);
    }
    if n.is_infinite() {
        return "∞".to_string();
    }

    let mut tier = 0;
    let mut scaled = n;
    while scaled >= 1000.0 && tier < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        tier += 1;
    }

    let fixed = fixed2(scaled);
    let text = fixed
        .strip_suffix(".00")
        .or_else(|| fixed.strip_suffix(".0"))
        .unwrap_or(fixed.as_str());
    format!("{}{}", text, SUFFIXES[tier])
}

/// Nearest whole number, halves rounded away from zero
fn whole(n: f64) -> String {
    let r = n.round();
    // Avoid "-0"
    if r == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", r)
    }
}

/// Two decimals, halves rounded up
///
/// Rounds the scaled value before printing, so a mantissa like `1.005`
/// (stored as 1.00499..) may come out one hundredth away from `toFixed(2)`.
/// Only the last displayed digit can differ.
fn fixed2(n: f64) -> String {
    format!("{:.2}", (n * 100.0).round() / 100.0)
}
