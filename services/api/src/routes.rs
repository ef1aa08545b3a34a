use crate::infra::AppState;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use leadmarket::marketplace::{
    connection_router, MarketplaceRepository, MarketplaceService, NotificationPublisher,
};
use leadmarket::rating::{quote_router, RatingEngine};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Compose the library routers with the service's operational endpoints.
pub(crate) fn with_core_routes<R, N>(
    engine: Arc<RatingEngine>,
    service: Arc<MarketplaceService<R, N>>,
) -> Router
where
    R: MarketplaceRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .merge(quote_router(engine))
        .merge(connection_router(service))
        .route("/healthz", get(health_handler))
        .route("/readyz", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readiness_handler(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Acquire) {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "starting")
    }
}

async fn metrics_handler(Extension(state): Extension<AppState>) -> impl IntoResponse {
    state.metrics.render()
}
