use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::filter::GetMetricsFilter;
use super::repository::FactRepository;
use super::service::{MetricsData, MetricsService, MetricsServiceError};

/// Router exposing the dashboard metrics. The filter is accepted either as
/// query parameters (`GET`) or as a JSON body (`POST`).
pub fn metrics_router<R>(service: Arc<MetricsService<R>>) -> Router
where
    R: FactRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/metrics",
            get(metrics_query_handler::<R>).post(metrics_body_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn metrics_query_handler<R>(
    State(service): State<Arc<MetricsService<R>>>,
    Query(filter): Query<GetMetricsFilter>,
) -> Response
where
    R: FactRepository + 'static,
{
    respond(service.get_metrics(&filter).await)
}

pub(crate) async fn metrics_body_handler<R>(
    State(service): State<Arc<MetricsService<R>>>,
    Json(filter): Json<GetMetricsFilter>,
) -> Response
where
    R: FactRepository + 'static,
{
    respond(service.get_metrics(&filter).await)
}

fn respond(result: Result<MetricsData, MetricsServiceError>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(MetricsServiceError::Filter(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
