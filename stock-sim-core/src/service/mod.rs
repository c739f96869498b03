pub mod errors;
pub mod stock_data;
pub mod types;

// Re-export main interfaces
pub use errors::ServiceError;
pub use stock_data::StockDataService;
pub use types::*;
