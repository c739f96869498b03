// =================================================================
// provider/alpha_vantage.rs - Alpha Vantage Daily Series Client
// =================================================================

use async_trait::async_trait;
use std::str::FromStr;
use std::time::Duration;
use stock_sim_common::data::TimeSeries;
use tracing::{debug, info, warn};

use super::{
    errors::ProviderError,
    traits::DataProvider,
    types::{AlphaVantageDailyResponse, OutputSize},
    utils::{convert_daily_series, validate_symbol},
};
use crate::config;

const ALPHA_VANTAGE_API_URL: &str = "https://www.alphavantage.co";
const DAILY_FUNCTION: &str = "TIME_SERIES_DAILY";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Alpha Vantage implementation of `DataProvider`.
///
/// One request per call; no retry and no caching.
pub struct AlphaVantageProvider {
    api_url: String,
    api_key: String,
    output_size: OutputSize,
    timeout: Duration,
    client: reqwest::Client,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: ALPHA_VANTAGE_API_URL.to_string(),
            api_key: api_key.into(),
            output_size: OutputSize::Full,
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_settings(settings: &config::Provider) -> Result<Self, ProviderError> {
        Ok(Self::new(settings.api_key.clone())
            .with_api_url(&settings.base_url)
            .with_output_size(OutputSize::from_str(&settings.output_size)?)
            .with_timeout(Duration::from_secs(settings.timeout_secs)))
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Interpret a response body; `Ok(None)` when the provider reports no series
    fn parse_daily_response(
        &self,
        symbol: &str,
        body: &str,
    ) -> Result<Option<TimeSeries>, ProviderError> {
        let response: AlphaVantageDailyResponse = serde_json::from_str(body)?;

        if let Some(raw) = response.time_series {
            let series = convert_daily_series(raw)?;
            info!("Fetched {} daily bars for {}", series.len(), symbol);
            return Ok(Some(series));
        }

        if let Some(note) = response.note.or(response.information) {
            warn!("Provider throttled request for {}: {}", symbol, note);
            return Err(ProviderError::RateLimit(note));
        }

        if let Some(message) = response.error_message {
            debug!("Provider has no series for {}: {}", symbol, message);
        } else {
            debug!("Provider response for {} carried no series", symbol);
        }
        Ok(None)
    }

    async fn fetch_daily_series_api(&self, symbol: &str) -> Result<String, ProviderError> {
        let url = format!("{}/query", self.api_url);
        debug!(
            "Fetching {} for {} from {} (outputsize={})",
            DAILY_FUNCTION,
            symbol,
            url,
            self.output_size.as_str()
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", DAILY_FUNCTION),
                ("symbol", symbol),
                ("outputsize", self.output_size.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl DataProvider for AlphaVantageProvider {
    async fn daily_series(&self, symbol: &str) -> Result<Option<TimeSeries>, ProviderError> {
        let symbol = validate_symbol(symbol)?;
        info!("Requesting daily series for symbol: {}", symbol);

        let body = self.fetch_daily_series_api(&symbol).await?;
        self.parse_daily_response(&symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use stock_sim_common::data::parse_iso_date;
    use tokio::net::TcpListener;

    const DAILY_BODY: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "IBM"
        },
        "Time Series (Daily)": {
            "2024-01-03": {
                "1. open": "161.0000",
                "2. high": "161.7300",
                "3. low": "160.0800",
                "4. close": "160.1000",
                "5. volume": "4086065"
            },
            "2024-01-02": {
                "1. open": "162.8300",
                "2. high": "163.2900",
                "3. low": "160.3800",
                "4. close": "161.0000",
                "5. volume": "3825045"
            }
        }
    }"#;

    /// Serve `router` on an ephemeral local port and return its base URL
    async fn spawn_fake_provider(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_daily_response() {
        let provider = AlphaVantageProvider::new("demo");
        let series = provider
            .parse_daily_response("IBM", DAILY_BODY)
            .unwrap()
            .unwrap();

        let date = parse_iso_date("2024-01-02").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[&date].open, dec!(162.83));
        assert_eq!(series[&date].close, dec!(161));
    }

    #[test]
    fn test_parse_error_message_means_no_series() {
        let provider = AlphaVantageProvider::new("demo");
        let body = r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#;

        assert!(provider.parse_daily_response("NOPE", body).unwrap().is_none());
    }

    #[test]
    fn test_parse_note_is_rate_limit() {
        let provider = AlphaVantageProvider::new("demo");
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;

        let err = provider.parse_daily_response("IBM", body).unwrap_err();
        assert!(matches!(err, ProviderError::RateLimit(_)));

        let body = r#"{"Information": "This is a premium endpoint."}"#;
        let err = provider.parse_daily_response("IBM", body).unwrap_err();
        assert!(matches!(err, ProviderError::RateLimit(_)));
    }

    #[test]
    fn test_parse_garbage_is_parse_error() {
        let provider = AlphaVantageProvider::new("demo");
        let err = provider.parse_daily_response("IBM", "<html>").unwrap_err();
        assert!(matches!(err, ProviderError::ParseError(_)));
    }

    #[test]
    fn test_from_settings() {
        let settings = config::Provider {
            base_url: "http://localhost:9999/".to_string(),
            api_key: "secret".to_string(),
            output_size: "compact".to_string(),
            timeout_secs: 3,
        };
        let provider = AlphaVantageProvider::from_settings(&settings).unwrap();

        assert_eq!(provider.api_url, "http://localhost:9999");
        assert_eq!(provider.output_size, OutputSize::Compact);
        assert_eq!(provider.timeout, Duration::from_secs(3));

        let bad = config::Provider {
            output_size: "huge".to_string(),
            ..settings
        };
        assert!(AlphaVantageProvider::from_settings(&bad).is_err());
    }

    #[tokio::test]
    async fn test_daily_series_sends_expected_query() {
        let router = Router::new().route(
            "/query",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let param = |key: &str| params.get(key).map(String::as_str);
                let expected = param("function") == Some("TIME_SERIES_DAILY")
                    && param("symbol") == Some("IBM")
                    && param("outputsize") == Some("compact")
                    && param("apikey") == Some("test-key");
                if expected {
                    (StatusCode::OK, DAILY_BODY.to_string())
                } else {
                    (StatusCode::BAD_REQUEST, format!("unexpected query: {:?}", params))
                }
            }),
        );
        let base_url = spawn_fake_provider(router).await;

        let provider = AlphaVantageProvider::new("test-key")
            .with_api_url(&base_url)
            .with_output_size(OutputSize::Compact);
        let series = provider.daily_series("ibm").await.unwrap().unwrap();

        assert_eq!(series.len(), 2);
    }

    #[tokio::test]
    async fn test_daily_series_http_error() {
        let router = Router::new().route(
            "/query",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let base_url = spawn_fake_provider(router).await;

        let provider = AlphaVantageProvider::new("demo").with_api_url(&base_url);
        let err = provider.daily_series("IBM").await.unwrap_err();

        match err {
            ProviderError::ApiError(message) => {
                assert!(message.contains("503"));
                assert!(message.contains("maintenance"));
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_daily_series_rejects_bad_symbol_without_request() {
        let provider = AlphaVantageProvider::new("demo").with_api_url("http://127.0.0.1:1");
        let err = provider.daily_series("AA PL").await.unwrap_err();

        assert!(matches!(err, ProviderError::InvalidSymbol(_)));
    }
}
