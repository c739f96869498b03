use std::sync::Arc;
use stock_sim_common::backtest::{simulate, DailyResult};
use tracing::{error, info};

use super::{ServiceError, StockDataRequest};
use crate::provider::{DataProvider, ProviderError};

/// Fetches a ticker's daily history and runs the simulator over it.
///
/// Holds no per-request state; concurrent calls are independent.
pub struct StockDataService {
    provider: Arc<dyn DataProvider>,
}

impl StockDataService {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self { provider }
    }

    pub async fn run(&self, request: &StockDataRequest) -> Result<Vec<DailyResult>, ServiceError> {
        request.params.validate()?;

        info!(
            "Running simulation for {} from {} to {} with {}",
            request.ticker,
            request.params.start_date,
            request.params.end_date,
            request.params.initial_amount
        );

        let series = match self.provider.daily_series(&request.ticker).await {
            Ok(Some(series)) => series,
            Ok(None) => {
                info!("No series available for {}", request.ticker);
                return Err(ServiceError::NoDataFound(request.ticker.clone()));
            }
            Err(ProviderError::InvalidSymbol(message)) => {
                return Err(ServiceError::InvalidParameters(message));
            }
            Err(e) => {
                error!("Error fetching stock data for {}: {}", request.ticker, e);
                return Err(ServiceError::ProviderFailure(e));
            }
        };

        let results = simulate(&series, &request.params).map_err(|e| {
            error!("Simulation failed for {}: {}", request.ticker, e);
            ServiceError::from(e)
        })?;

        info!(
            "Simulated {} trading days for {}",
            results.len(),
            request.ticker
        );
        Ok(results)
    }
}
