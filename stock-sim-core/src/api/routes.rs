use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stock_sim_common::backtest::DailyResult;
use stock_sim_common::export::to_csv_string;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use super::state::AppState;
use crate::service::{ServiceError, StockDataRequest};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/stock-data", get(stock_data))
        .route("/api/stock-data/csv", get(stock_data_csv))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Raw query string; every field optional so a missing one gets our own 400 body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDataQuery {
    pub ticker: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub initial_amount: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    MissingParameters,
    Service(ServiceError),
    Export(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, kind, details) = match self {
            ApiError::MissingParameters => (
                StatusCode::BAD_REQUEST,
                "Missing required parameters",
                "invalid_parameters",
                None,
            ),
            ApiError::Export(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to export results",
                "export",
                Some(message),
            ),
            ApiError::Service(err) => {
                let kind = err.kind();
                match err {
                    ServiceError::InvalidParameters(message) => (
                        StatusCode::BAD_REQUEST,
                        "Invalid parameters",
                        kind,
                        Some(message),
                    ),
                    ServiceError::NoDataFound(_) => (
                        StatusCode::NOT_FOUND,
                        "No data found for the given ticker",
                        kind,
                        None,
                    ),
                    ServiceError::DataQuality(message) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "Invalid price data",
                        kind,
                        Some(message),
                    ),
                    ServiceError::ProviderFailure(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to fetch stock data",
                        kind,
                        Some(e.to_string()),
                    ),
                }
            }
        };

        let body = ErrorBody {
            error: error.to_string(),
            kind,
            details,
        };
        (status, Json(body)).into_response()
    }
}

async fn root() -> &'static str {
    "Stock profit simulator API is running"
}

async fn stock_data(
    State(state): State<AppState>,
    query: Result<Query<StockDataQuery>, QueryRejection>,
) -> Result<Json<Vec<DailyResult>>, ApiError> {
    let (_, results) = run_query(&state, &parse_query(query)?).await?;
    Ok(Json(results))
}

async fn stock_data_csv(
    State(state): State<AppState>,
    query: Result<Query<StockDataQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let (request, results) = run_query(&state, &parse_query(query)?).await?;
    let csv = to_csv_string(&results).map_err(|e| ApiError::Export(e.to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.csv\"", request.ticker),
        ),
    ];
    Ok((headers, csv).into_response())
}

fn parse_query(
    query: Result<Query<StockDataQuery>, QueryRejection>,
) -> Result<StockDataQuery, ApiError> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => {
            warn!("Rejecting unparseable query string: {}", rejection.body_text());
            Err(ServiceError::InvalidParameters(rejection.body_text()).into())
        }
    }
}

async fn run_query(
    state: &AppState,
    query: &StockDataQuery,
) -> Result<(StockDataRequest, Vec<DailyResult>), ApiError> {
    info!(
        "Received parameters: ticker={:?}, startDate={:?}, endDate={:?}, initialAmount={:?}",
        query.ticker, query.start_date, query.end_date, query.initial_amount
    );

    let (ticker, start_date, end_date, initial_amount) = match (
        non_empty(&query.ticker),
        non_empty(&query.start_date),
        non_empty(&query.end_date),
        non_empty(&query.initial_amount),
    ) {
        (Some(t), Some(s), Some(e), Some(a)) => (t, s, e, a),
        _ => {
            warn!("Rejecting request with missing parameters");
            return Err(ApiError::MissingParameters);
        }
    };

    let request = StockDataRequest::parse(ticker, start_date, end_date, initial_amount)?;
    let results = state.service.run(&request).await?;

    Ok((request, results))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 Not Found")
}
