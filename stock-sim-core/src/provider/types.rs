// =================================================================
// provider/types.rs - Data Structures
// =================================================================

use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

use super::ProviderError;

/// How much history to request per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSize {
    /// Latest 100 data points
    Compact,
    /// Full history
    Full,
}

impl OutputSize {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

impl FromStr for OutputSize {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "compact" => Ok(OutputSize::Compact),
            "full" => Ok(OutputSize::Full),
            other => Err(ProviderError::ParseError(format!(
                "Unknown output size '{}'",
                other
            ))),
        }
    }
}

/// Alpha Vantage `TIME_SERIES_DAILY` response body.
///
/// A successful call carries the series; a failed lookup carries
/// `Error Message`; throttled or premium-only calls carry `Note` or
/// `Information`.
#[derive(Debug, Deserialize)]
pub struct AlphaVantageDailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    pub time_series: Option<HashMap<String, AlphaVantageDailyBar>>,

    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    #[serde(rename = "Note")]
    pub note: Option<String>,

    #[serde(rename = "Information")]
    pub information: Option<String>,
}

/// One day in an Alpha Vantage daily series
#[derive(Debug, Deserialize, Clone)]
pub struct AlphaVantageDailyBar {
    /// Open price
    #[serde(rename = "1. open")]
    pub open: String,

    /// Close price
    #[serde(rename = "4. close")]
    pub close: String,
}
