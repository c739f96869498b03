// =================================================================
// data/types.rs - Price Data Structures
// =================================================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Wire format for calendar dates, fixed-width so string order equals date order
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Daily price series keyed by trading date. Keys are unordered and may fall
/// outside any requested range.
pub type TimeSeries = HashMap<NaiveDate, PriceBar>;

/// One trading day's open and close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub close: Decimal,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: Decimal, close: Decimal) -> Self {
        Self { date, open, close }
    }

    /// Returns the first non-positive price field, if any
    pub fn invalid_field(&self) -> Option<(PriceField, Decimal)> {
        if self.open <= Decimal::ZERO {
            Some((PriceField::Open, self.open))
        } else if self.close <= Decimal::ZERO {
            Some((PriceField::Close, self.close))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    Close,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::Open => write!(f, "open"),
            PriceField::Close => write!(f, "close"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid price '{value}': {reason}")]
    InvalidPrice { value: String, reason: String },
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map_err(|_| DataError::InvalidDate(value.to_string()))
}

/// Build a `TimeSeries` from bars, later bars replacing earlier ones on the same date
pub fn time_series_from_bars<I>(bars: I) -> TimeSeries
where
    I: IntoIterator<Item = PriceBar>,
{
    bars.into_iter().map(|bar| (bar.date, bar)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_iso_date() {
        let date = parse_iso_date("2024-01-02").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(parse_iso_date(" 2024-01-02 ").unwrap(), date);

        assert!(matches!(
            parse_iso_date("01/02/2024"),
            Err(DataError::InvalidDate(_))
        ));
        assert!(parse_iso_date("2024-02-30").is_err());
        assert!(parse_iso_date("").is_err());
    }

    #[test]
    fn test_invalid_field() {
        let date = parse_iso_date("2024-01-02").unwrap();

        assert_eq!(PriceBar::new(date, dec!(10), dec!(12)).invalid_field(), None);
        assert_eq!(
            PriceBar::new(date, dec!(0), dec!(12)).invalid_field(),
            Some((PriceField::Open, dec!(0)))
        );
        assert_eq!(
            PriceBar::new(date, dec!(10), dec!(-1)).invalid_field(),
            Some((PriceField::Close, dec!(-1)))
        );
    }

    #[test]
    fn test_time_series_from_bars_keys_by_date() {
        let d1 = parse_iso_date("2024-01-03").unwrap();
        let d2 = parse_iso_date("2024-01-02").unwrap();
        let series = time_series_from_bars(vec![
            PriceBar::new(d1, dec!(12), dec!(11)),
            PriceBar::new(d2, dec!(10), dec!(12)),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series[&d2].open, dec!(10));
    }
}
