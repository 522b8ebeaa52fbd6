use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::PerformanceBody};
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use folio_core::portfolio::performance::BenchmarkComparison;
use folio_core::utils::time_utils::parse_date;

#[utoipa::path(post, path = "/api/v1/users/{username}/performance", request_body = PerformanceBody, responses((status = 200, description = "Portfolio compared with the benchmark"), (status = 422, description = "Not enough history")))]
pub async fn compare_with_benchmark(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Option<Json<PerformanceBody>>,
) -> ApiResult<Json<BenchmarkComparison>> {
    let identity = state.identity(&username)?;
    let body = body.map(|Json(inner)| inner).unwrap_or_default();

    let start = match body.start_date.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => Some(parse_date(d)?),
        _ => None,
    };
    let request = state
        .performance_service
        .request(body.benchmark.as_deref(), start)?;

    let ledger = state.portfolio_service.get_ledger(&identity)?;
    let comparison = state
        .performance_service
        .compare_with_benchmark(&ledger, &request)
        .await?;
    Ok(Json(comparison))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users/{username}/performance", post(compare_with_benchmark))
}
