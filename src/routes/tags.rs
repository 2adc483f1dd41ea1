use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::error::AppResult;
use crate::extractors::{AppJson, AppPath};
use crate::schemas::tag::TagCreate;
use crate::services::TagService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/slug/{slug}", get(get_tag_by_slug))
        .route("/tags/{id}", delete(delete_tag))
}

async fn create_tag(
    State(state): State<AppState>,
    AppJson(input): AppJson<TagCreate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let tag = TagService::new(&conn).create(&input)?;
    Ok((StatusCode::CREATED, Json(tag)).into_response())
}

async fn list_tags(State(state): State<AppState>) -> AppResult<Response> {
    let conn = state.db.get()?;
    let tags = TagService::new(&conn).list()?;
    Ok((StatusCode::OK, Json(tags)).into_response())
}

async fn get_tag_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let tag = TagService::new(&conn).get_by_slug(&slug)?;
    Ok((StatusCode::OK, Json(tag)).into_response())
}

async fn delete_tag(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    TagService::new(&conn).delete(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
