// ---------------------------------------------------------------------------
// Number formatting for metrics and the preview table
// ---------------------------------------------------------------------------

/// Round to a whole number and group digits with commas: `1234567.4` → `1,234,567`.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Rupee amount: `₨1,250,000`.
pub fn currency(value: f64) -> String {
    format!("₨{}", thousands(value))
}

pub fn count(n: usize) -> String {
    thousands(n as f64)
}

pub fn mean_price(mean: Option<f64>) -> String {
    mean.map(thousands).unwrap_or_else(|| "N/A".to_string())
}

pub fn mean_year(mean: Option<f64>) -> String {
    mean.map(|y| format!("{y:.1}"))
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(1_234_567.4), "1,234,567");
        assert_eq!(thousands(-45_000.0), "-45,000");
        assert_eq!(thousands(f64::NAN), "N/A");
    }

    #[test]
    fn metrics_render_missing_means() {
        assert_eq!(currency(225_000.0), "₨225,000");
        assert_eq!(count(12_345), "12,345");
        assert_eq!(mean_price(None), "N/A");
        assert_eq!(mean_year(Some(2013.5)), "2013.5");
        assert_eq!(mean_year(None), "N/A");
    }
}
