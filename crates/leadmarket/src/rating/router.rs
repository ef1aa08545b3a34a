use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::engine::RatingEngine;
use super::profile::RatingProfile;

/// Router builder exposing the quote computation over HTTP.
pub fn quote_router(engine: Arc<RatingEngine>) -> Router {
    Router::new()
        .route("/api/v1/quotes", post(quote_handler))
        .with_state(engine)
}

pub(crate) async fn quote_handler(
    State(engine): State<Arc<RatingEngine>>,
    axum::Json(profile): axum::Json<RatingProfile>,
) -> Response {
    let quotes = engine.quotes(&profile);
    let payload = json!({
        "count": quotes.len(),
        "quotes": quotes,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
