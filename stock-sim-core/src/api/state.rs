use std::sync::Arc;

use crate::service::StockDataService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StockDataService>,
}

impl AppState {
    pub fn new(service: Arc<StockDataService>) -> Self {
        Self { service }
    }
}
