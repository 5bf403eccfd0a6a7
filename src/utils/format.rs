/// Formats a measurement with one decimal place and comma thousands
/// separators, e.g. `1234.56` -> `1,234.6`.
pub fn one_decimal(value: f64) -> String {
    let fixed = format!("{:.1}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.04 rounds to "0.0" and must not print as "-0.0"
    let sign = if value < 0.0 && fixed != "0.0" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_decimal() {
        assert_eq!(one_decimal(0.0), "0.0");
        assert_eq!(one_decimal(120.0), "120.0");
        assert_eq!(one_decimal(45.24), "45.2");
        assert_eq!(one_decimal(45.26), "45.3");
        assert_eq!(one_decimal(1234.56), "1,234.6");
        assert_eq!(one_decimal(1_000_000.0), "1,000,000.0");
        assert_eq!(one_decimal(-1234.5), "-1,234.5");
        assert_eq!(one_decimal(-0.04), "0.0");
    }
}
