use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::extractors::AppJson;
use crate::schemas::newsletter::{Subscribe, Unsubscribe};
use crate::services::NewsletterService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/newsletter/subscribe", post(subscribe))
        .route("/newsletter/unsubscribe", post(unsubscribe))
}

async fn subscribe(
    State(state): State<AppState>,
    AppJson(input): AppJson<Subscribe>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let subscriber = NewsletterService::new(&conn).subscribe(&input)?;
    Ok((StatusCode::CREATED, Json(subscriber)).into_response())
}

async fn unsubscribe(
    State(state): State<AppState>,
    AppJson(input): AppJson<Unsubscribe>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    NewsletterService::new(&conn).unsubscribe(&input.email)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
