/// Format a count with thousands separators: 1,234,567
pub fn count(val: u64) -> String {
    let digits = val.to_string();
    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// One-decimal percentage label: 12.3%
pub fn percent(val: f64) -> String {
    format!("{val:.1}%")
}

/// Three-letter month label for narrow axes.
pub fn short_month(month: chrono::Month) -> &'static str {
    &month.name()[..3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_formatting() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(1234567), "1,234,567");
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(75.0), "75.0%");
        assert_eq!(percent(33.333), "33.3%");
        assert_eq!(percent(0.0), "0.0%");
    }

    #[test]
    fn test_short_month() {
        assert_eq!(short_month(chrono::Month::September), "Sep");
    }
}
