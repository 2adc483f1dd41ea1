use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::schemas::media::MediaCreate;
use crate::schemas::Pagination;
use crate::services::MediaService;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/media", get(list_media).post(create_media))
        .route("/media/{id}", get(get_media).delete(delete_media))
}

async fn create_media(
    State(state): State<AppState>,
    AppJson(input): AppJson<MediaCreate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let media = MediaService::new(&conn).create(&input)?;
    Ok((StatusCode::CREATED, Json(media)).into_response())
}

async fn list_media(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> AppResult<Response> {
    let (skip, limit) = page.resolve(DEFAULT_LIMIT, MAX_LIMIT)?;
    let conn = state.db.get()?;
    let media = MediaService::new(&conn).list(skip, limit)?;
    Ok((StatusCode::OK, Json(media)).into_response())
}

async fn get_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let media = MediaService::new(&conn).get(id)?;
    Ok((StatusCode::OK, Json(media)).into_response())
}

async fn delete_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    MediaService::new(&conn).delete(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
