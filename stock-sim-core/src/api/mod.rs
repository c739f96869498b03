pub mod routes;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::service::StockDataService;
pub use state::AppState;

pub fn app(service: Arc<StockDataService>) -> Router {
    routes::router(AppState::new(service))
}

/// Serve the relay until `shutdown` resolves
pub async fn serve<F>(
    listen_addr: &str,
    service: Arc<StockDataService>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(listen_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown)
        .await
}
