//! Display formatting for salary figures.

/// Format as US dollars with thousands separators: `$126,850.00`.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return "n/a".to_string();
    }

    let cents = format!("{:.2}", amount.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(126_850.0), "$126,850.00");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(-4_200.5), "-$4,200.50");
        assert_eq!(format_usd(-0.001), "$0.00");
        assert_eq!(format_usd(f64::NAN), "n/a");
    }
}
