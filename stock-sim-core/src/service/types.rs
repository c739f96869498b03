use rust_decimal::Decimal;
use std::str::FromStr;
use stock_sim_common::backtest::{InvalidPricePolicy, SimulationParams};
use stock_sim_common::data::parse_iso_date;

use super::ServiceError;
use crate::provider::utils::validate_symbol;

/// A validated simulation request for one ticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDataRequest {
    pub ticker: String,
    pub params: SimulationParams,
}

impl StockDataRequest {
    /// Parse the raw string inputs of an HTTP query or CLI invocation
    pub fn parse(
        ticker: &str,
        start_date: &str,
        end_date: &str,
        initial_amount: &str,
    ) -> Result<Self, ServiceError> {
        let ticker = validate_symbol(ticker)
            .map_err(|e| ServiceError::InvalidParameters(e.to_string()))?;

        let start_date = parse_iso_date(start_date)
            .map_err(|e| ServiceError::InvalidParameters(format!("startDate: {}", e)))?;
        let end_date = parse_iso_date(end_date)
            .map_err(|e| ServiceError::InvalidParameters(format!("endDate: {}", e)))?;

        let initial_amount = Decimal::from_str(initial_amount.trim()).map_err(|_| {
            ServiceError::InvalidParameters(format!(
                "initialAmount '{}' is not a number",
                initial_amount
            ))
        })?;

        let params = SimulationParams::new(start_date, end_date, initial_amount)?;

        Ok(Self { ticker, params })
    }

    pub fn with_invalid_price_policy(mut self, policy: InvalidPricePolicy) -> Self {
        self.params = self.params.with_invalid_price_policy(policy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_valid_request() {
        let request = StockDataRequest::parse("aapl", "2024-01-02", "2024-03-28", "10000.50").unwrap();

        assert_eq!(request.ticker, "AAPL");
        assert_eq!(request.params.start_date, parse_iso_date("2024-01-02").unwrap());
        assert_eq!(request.params.end_date, parse_iso_date("2024-03-28").unwrap());
        assert_eq!(request.params.initial_amount, dec!(10000.50));
        assert_eq!(request.params.invalid_price_policy, InvalidPricePolicy::Fail);
    }

    #[test]
    fn test_parse_rejects_malformed_values() {
        let cases = [
            ("AAPL", "2024/01/02", "2024-03-28", "100"),
            ("AAPL", "2024-01-02", "yesterday", "100"),
            ("AAPL", "2024-01-02", "2024-03-28", "lots"),
            ("AAPL", "2024-01-02", "2024-03-28", "0"),
            ("AAPL", "2024-01-02", "2024-03-28", "-50"),
            ("AAPL", "2024-03-28", "2024-01-02", "100"),
            ("AA PL", "2024-01-02", "2024-03-28", "100"),
        ];

        for (ticker, start, end, amount) in cases {
            let result = StockDataRequest::parse(ticker, start, end, amount);
            assert!(
                matches!(result, Err(ServiceError::InvalidParameters(_))),
                "expected rejection for {:?}",
                (ticker, start, end, amount)
            );
        }
    }
}
