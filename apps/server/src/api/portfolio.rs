use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::TradeBody};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use folio_core::{
    ledger::{Ledger, Position, RealizedSale},
    portfolio::holdings::{PositionsView, SalesView, TradeRequest},
};

#[utoipa::path(get, path = "/api/v1/users/{username}/portfolio", responses((status = 200, description = "Open positions and sale history")))]
pub async fn get_portfolio(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Ledger>> {
    let identity = state.identity(&username)?;
    Ok(Json(state.portfolio_service.get_ledger(&identity)?))
}

#[utoipa::path(get, path = "/api/v1/users/{username}/positions", responses((status = 200, description = "Positions valued at live prices")))]
pub async fn get_positions(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PositionsView>> {
    let identity = state.identity(&username)?;
    Ok(Json(state.portfolio_service.positions_view(&identity).await?))
}

#[utoipa::path(post, path = "/api/v1/users/{username}/buy", request_body = TradeBody, responses((status = 200, description = "Updated position")))]
pub async fn buy(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<TradeBody>,
) -> ApiResult<Json<Position>> {
    let identity = state.identity(&username)?;
    let trade = TradeRequest::try_from(body)?;
    Ok(Json(state.portfolio_service.buy(&identity, trade).await?))
}

#[utoipa::path(post, path = "/api/v1/users/{username}/sell", request_body = TradeBody, responses((status = 200, description = "Recorded sale")))]
pub async fn sell(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<TradeBody>,
) -> ApiResult<Json<RealizedSale>> {
    let identity = state.identity(&username)?;
    let trade = TradeRequest::try_from(body)?;
    Ok(Json(state.portfolio_service.sell(&identity, trade).await?))
}

#[utoipa::path(get, path = "/api/v1/users/{username}/sales", responses((status = 200, description = "Sale history with undo indices")))]
pub async fn get_sales(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SalesView>> {
    let identity = state.identity(&username)?;
    Ok(Json(state.portfolio_service.sales_view(&identity)?))
}

#[utoipa::path(delete, path = "/api/v1/users/{username}/sales/{index}", responses((status = 200, description = "Undone sale")))]
pub async fn undo_sale(
    Path((username, index)): Path<(String, usize)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RealizedSale>> {
    let identity = state.identity(&username)?;
    Ok(Json(state.portfolio_service.undo_sale(&identity, index).await?))
}

#[utoipa::path(delete, path = "/api/v1/users/{username}/positions/{symbol}", responses((status = 204)))]
pub async fn delete_position(
    Path((username, symbol)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let identity = state.identity(&username)?;
    state
        .portfolio_service
        .delete_position(&identity, &symbol)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/{username}/portfolio", get(get_portfolio))
        .route("/users/{username}/positions", get(get_positions))
        .route("/users/{username}/positions/{symbol}", delete(delete_position))
        .route("/users/{username}/buy", post(buy))
        .route("/users/{username}/sell", post(sell))
        .route("/users/{username}/sales", get(get_sales))
        .route("/users/{username}/sales/{index}", delete(undo_sale))
}
