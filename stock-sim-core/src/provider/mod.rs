// provider/mod.rs
pub mod alpha_vantage;
pub mod errors;
pub mod traits;
pub mod types;
pub mod utils;

pub use alpha_vantage::AlphaVantageProvider;
pub use errors::ProviderError;
pub use traits::DataProvider;
pub use types::*;
