use stock_sim_common::backtest::SimulationError;
use thiserror::Error;

use crate::provider::ProviderError;

/// Service layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("No data found for ticker {0}")]
    NoDataFound(String),

    #[error("Provider failure: {0}")]
    ProviderFailure(#[from] ProviderError),

    #[error("Data quality error: {0}")]
    DataQuality(String),
}

impl ServiceError {
    /// Stable label for logs and error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidParameters(_) => "invalid_parameters",
            ServiceError::NoDataFound(_) => "no_data_found",
            ServiceError::ProviderFailure(_) => "provider_failure",
            ServiceError::DataQuality(_) => "data_quality",
        }
    }
}

impl From<SimulationError> for ServiceError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::InvalidParameters(message) => ServiceError::InvalidParameters(message),
            other => ServiceError::DataQuality(other.to_string()),
        }
    }
}
