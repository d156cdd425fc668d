/// Format an amount with up to 6 decimal places, trimming trailing zeros.
///
/// Keeps quotes readable: `120000` instead of `120000.000000`, but still
/// `0.000833` for small rates.
pub fn format_amount(value: f64) -> String {
    let s = format!("{:.6}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers_have_no_decimals() {
        assert_eq!(format_amount(120000.0), "120000");
        assert_eq!(format_amount(2.0), "2");
    }

    #[test]
    fn test_fractions_keep_significant_digits() {
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(0.000833), "0.000833");
    }

    #[test]
    fn test_precision_capped_at_six() {
        assert_eq!(format_amount(1.0 / 3.0), "0.333333");
    }
}
