use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};

use crate::error::AppResult;
use crate::extractors::{AppPath, CurrentUser, Visitor};
use crate::repositories::LikeTarget;
use crate::services::{CommentService, EngagementService};
use crate::state::AppState;

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments/admin/pending", get(list_pending))
        .route("/comments/{id}", delete(delete_comment))
        .route("/comments/{id}/replies", get(list_replies))
        .route("/comments/{id}/approve", patch(approve_comment))
        .route(
            "/comments/{id}/like",
            post(like_comment).delete(unlike_comment),
        )
}

// --- Handlers ---

async fn list_replies(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let replies = CommentService::new(&conn).replies(id)?;
    Ok((StatusCode::OK, Json(replies)).into_response())
}

async fn list_pending(State(state): State<AppState>, _current: CurrentUser) -> AppResult<Response> {
    let conn = state.db.get()?;
    let pending = CommentService::new(&conn).pending()?;
    Ok((StatusCode::OK, Json(pending)).into_response())
}

async fn approve_comment(
    State(state): State<AppState>,
    _current: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let comment = CommentService::new(&conn).approve(id)?;
    Ok((StatusCode::OK, Json(comment)).into_response())
}

async fn delete_comment(
    State(state): State<AppState>,
    _current: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    CommentService::new(&conn).delete(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn like_comment(
    State(state): State<AppState>,
    visitor: Visitor,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let (status, created) =
        EngagementService::new(&conn).like(LikeTarget::Comment(id), &visitor.fingerprint)?;
    let code = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((code, Json(status)).into_response())
}

async fn unlike_comment(
    State(state): State<AppState>,
    visitor: Visitor,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let status =
        EngagementService::new(&conn).unlike(LikeTarget::Comment(id), &visitor.fingerprint)?;
    Ok((StatusCode::OK, Json(status)).into_response())
}
