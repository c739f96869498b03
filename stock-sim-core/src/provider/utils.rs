// =================================================================
// provider/utils.rs - Utility Functions
// =================================================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use stock_sim_common::data::{parse_iso_date, PriceBar, TimeSeries};

use super::{AlphaVantageDailyBar, ProviderError};

/// Convert the provider's date-keyed bars into a `TimeSeries`.
///
/// Dates and prices are parsed here so the simulator only ever sees typed
/// values. Non-positive prices pass through untouched; judging them is the
/// simulator's job.
pub fn convert_daily_series(
    raw: HashMap<String, AlphaVantageDailyBar>,
) -> Result<TimeSeries, ProviderError> {
    raw.into_iter()
        .map(|(date, bar)| -> Result<(NaiveDate, PriceBar), ProviderError> {
            let date = parse_iso_date(&date)
                .map_err(|e| ProviderError::ParseError(e.to_string()))?;
            let open = parse_price(&bar.open)?;
            let close = parse_price(&bar.close)?;
            Ok((date, PriceBar::new(date, open, close)))
        })
        .collect()
}

fn parse_price(value: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_str(value.trim())
        .map_err(|e| ProviderError::ParseError(format!("Invalid price '{}': {}", value, e)))
}

/// Validate and normalise a ticker symbol
pub fn validate_symbol(symbol: &str) -> Result<String, ProviderError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ProviderError::InvalidSymbol(
            "Symbol cannot be empty".to_string(),
        ));
    }

    let symbol = symbol.to_uppercase();

    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ProviderError::InvalidSymbol(format!(
            "Symbol '{}' contains invalid characters",
            symbol
        )));
    }

    if symbol.len() > 10 {
        return Err(ProviderError::InvalidSymbol(format!(
            "Symbol '{}' has invalid length",
            symbol
        )));
    }

    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw_bar(open: &str, close: &str) -> AlphaVantageDailyBar {
        AlphaVantageDailyBar {
            open: open.to_string(),
            close: close.to_string(),
        }
    }

    #[test]
    fn test_symbol_validation() {
        assert_eq!(validate_symbol("aapl").unwrap(), "AAPL");
        assert_eq!(validate_symbol(" BRK.B ").unwrap(), "BRK.B");
        assert_eq!(validate_symbol("RDS-A").unwrap(), "RDS-A");
        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("   ").is_err());
        assert!(validate_symbol("AAPL&x=1").is_err());
        assert!(validate_symbol("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_convert_daily_series() {
        let mut raw = HashMap::new();
        raw.insert("2024-01-03".to_string(), raw_bar("184.2200", "184.2500"));
        raw.insert("2024-01-02".to_string(), raw_bar("187.1500", "185.6400"));

        let series = convert_daily_series(raw).unwrap();
        let date = parse_iso_date("2024-01-02").unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[&date].date, date);
        assert_eq!(series[&date].open, dec!(187.15));
        assert_eq!(series[&date].close, dec!(185.64));
    }

    #[test]
    fn test_convert_keeps_zero_prices() {
        let mut raw = HashMap::new();
        raw.insert("2024-01-02".to_string(), raw_bar("0.0000", "1.0000"));

        let series = convert_daily_series(raw).unwrap();
        assert_eq!(series.values().next().unwrap().open, Decimal::ZERO);
    }

    #[test]
    fn test_convert_rejects_bad_input() {
        let mut raw = HashMap::new();
        raw.insert("01/02/2024".to_string(), raw_bar("1", "1"));
        assert!(matches!(
            convert_daily_series(raw),
            Err(ProviderError::ParseError(_))
        ));

        let mut raw = HashMap::new();
        raw.insert("2024-01-02".to_string(), raw_bar("n/a", "1"));
        let err = convert_daily_series(raw).unwrap_err();
        assert!(err.to_string().contains("n/a"));
    }
}
