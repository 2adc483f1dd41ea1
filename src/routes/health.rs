use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

async fn index() -> impl IntoResponse {
    Html("<h2>Welcome to the DataFlow API</h2>")
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "Ok" }))
}
