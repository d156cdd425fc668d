//! Demo-mode rate table.
//!
//! Rates are fixed placeholders for a real price feed; only four pairs are
//! ever quoted and lookups for anything else return `None`.

/// Source of conversion rates between currency codes.
///
/// Injected into the exchange service so a live feed can replace the demo
/// table without touching conversation logic.
pub trait RateSource: Send + Sync {
    /// Rate for the ordered pair, or `None` when the pair is not quoted.
    fn rate(&self, from: &str, to: &str) -> Option<f64>;
}

const BTC_USDT: f64 = 60_000.0;
const ETH_USDT: f64 = 3_000.0;

/// Fixed demo rates.
pub struct DemoRates;

impl RateSource for DemoRates {
    fn rate(&self, from: &str, to: &str) -> Option<f64> {
        match (from, to) {
            ("BTC", "USDT") => Some(BTC_USDT),
            ("ETH", "USDT") => Some(ETH_USDT),
            ("USDT", "BTC") => Some(1.0 / BTC_USDT),
            ("USDT", "ETH") => Some(1.0 / ETH_USDT),
            _ => None,
        }
    }
}

/// Destination amounts are rounded to this many decimal places.
pub const AMOUNT_DECIMALS: i32 = 6;

/// Round a computed destination amount to [`AMOUNT_DECIMALS`] places.
pub fn round_amount(value: f64) -> f64 {
    let scale = 10f64.powi(AMOUNT_DECIMALS);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_pairs() {
        let rates = DemoRates;
        assert_eq!(rates.rate("BTC", "USDT"), Some(60_000.0));
        assert_eq!(rates.rate("ETH", "USDT"), Some(3_000.0));
        assert_eq!(rates.rate("USDT", "BTC"), Some(1.0 / 60_000.0));
        assert_eq!(rates.rate("USDT", "ETH"), Some(1.0 / 3_000.0));
    }

    #[test]
    fn test_unquoted_pairs_miss() {
        let rates = DemoRates;
        assert_eq!(rates.rate("BTC", "ETH"), None);
        assert_eq!(rates.rate("ETH", "BTC"), None);
        assert_eq!(rates.rate("USDT", "USDT"), None);
        assert_eq!(rates.rate("DOGE", "USDT"), None);
        // Codes are case-sensitive, exactly as the callback payloads carry them.
        assert_eq!(rates.rate("btc", "USDT"), None);
    }

    #[test]
    fn test_round_amount_six_places() {
        assert_eq!(round_amount(2.0 * 60_000.0), 120_000.0);
        assert_eq!(round_amount(50.0 / 60_000.0), 0.000833);
        assert_eq!(round_amount(0.1234561), 0.123456);
        assert_eq!(round_amount(0.1234569), 0.123457);
    }
}
