// provider/traits.rs

use async_trait::async_trait;
use stock_sim_common::data::TimeSeries;

use super::ProviderError;

/// Source of historical daily prices
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Full daily history for `symbol`, or `None` when the provider has no series for it
    async fn daily_series(&self, symbol: &str) -> Result<Option<TimeSeries>, ProviderError>;
}
