use std::sync::Arc;

use crate::{
    config::Config,
    main_lib::AppState,
    models::{
        BenchmarkInfo, CatalogueItem, CatalogueResponse, PerformanceBody, TradeBody,
    },
};
use axum::{http::HeaderValue, routing::get, Json, Router};
use folio_core::{catalogue, constants::DEFAULT_USERNAME};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

mod performance;
mod portfolio;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(get, path = "/api/v1/catalogue", responses((status = 200, body = CatalogueResponse)))]
async fn get_catalogue(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<CatalogueResponse> {
    Json(CatalogueResponse {
        benchmark: BenchmarkInfo::for_ticker(&state.benchmark),
        default_username: DEFAULT_USERNAME.to_string(),
        entries: catalogue::entries().iter().map(CatalogueItem::from).collect(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        get_catalogue,
        portfolio::get_portfolio,
        portfolio::get_positions,
        portfolio::buy,
        portfolio::sell,
        portfolio::get_sales,
        portfolio::undo_sale,
        portfolio::delete_position,
        performance::compare_with_benchmark,
    ),
    components(schemas(
        TradeBody,
        PerformanceBody,
        CatalogueResponse,
        CatalogueItem,
        BenchmarkInfo
    )),
    tags((name = "folio"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/catalogue", get(get_catalogue))
        .merge(portfolio::router())
        .merge(performance::router());

    Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
