use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};

use crate::error::AppResult;
use crate::extractors::{AppJson, AppPath, AppQuery, CurrentUser, Visitor};
use crate::repositories::LikeTarget;
use crate::schemas::comment::CommentCreate;
use crate::schemas::engagement::ViewContext;
use crate::schemas::post::{PostCreate, PostUpdate};
use crate::schemas::Pagination;
use crate::services::{CommentService, EngagementService, PostService, SlugLookup};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
const DEFAULT_COMMENT_LIMIT: i64 = 50;

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_published).post(create_post))
        .route("/posts/admin/drafts", get(list_drafts))
        .route("/posts/slug/{slug}", get(get_post_by_slug))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{id}/publish", patch(publish_post))
        .route("/posts/{id}/tags", get(list_post_tags))
        .route(
            "/posts/{id}/tags/{tag_id}",
            put(attach_tag).delete(detach_tag),
        )
        .route("/posts/{id}/like", post(like_post).delete(unlike_post))
        .route("/posts/{id}/views", post(record_view))
        .route(
            "/posts/{id}/comments",
            get(list_comments).post(create_comment),
        )
}

// --- Handlers ---

async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(input): AppJson<PostCreate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = PostService::new(&conn).create(current.user.id, &input)?;
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

async fn list_published(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> AppResult<Response> {
    let (skip, limit) = page.resolve(DEFAULT_LIMIT, MAX_LIMIT)?;
    let conn = state.db.get()?;
    let posts = PostService::new(&conn).list_published(skip, limit)?;
    Ok((StatusCode::OK, Json(posts)).into_response())
}

async fn list_drafts(State(state): State<AppState>, current: CurrentUser) -> AppResult<Response> {
    let conn = state.db.get()?;
    let posts = PostService::new(&conn).list_drafts(current.user.id)?;
    Ok((StatusCode::OK, Json(posts)).into_response())
}

async fn get_post(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = PostService::new(&conn).get(id)?;
    Ok((StatusCode::OK, Json(post)).into_response())
}

async fn get_post_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    match PostService::new(&conn).get_by_slug(&slug)? {
        SlugLookup::Found(post) => Ok((StatusCode::OK, Json(post)).into_response()),
        SlugLookup::Moved(new_slug) => Ok((
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, format!("/posts/slug/{new_slug}"))],
        )
            .into_response()),
    }
}

async fn update_post(
    State(state): State<AppState>,
    current: CurrentUser,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<PostUpdate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = PostService::new(&conn).update(id, current.user.id, &input)?;
    Ok((StatusCode::OK, Json(post)).into_response())
}

async fn publish_post(
    State(state): State<AppState>,
    current: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let post = PostService::new(&conn).publish(id, current.user.id)?;
    Ok((StatusCode::OK, Json(post)).into_response())
}

async fn delete_post(
    State(state): State<AppState>,
    current: CurrentUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    PostService::new(&conn).delete(id, current.user.id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_post_tags(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let tags = PostService::new(&conn).tags(id)?;
    Ok((StatusCode::OK, Json(tags)).into_response())
}

async fn attach_tag(
    State(state): State<AppState>,
    current: CurrentUser,
    AppPath((id, tag_id)): AppPath<(i64, i64)>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let tags = PostService::new(&conn).attach_tag(id, current.user.id, tag_id)?;
    Ok((StatusCode::OK, Json(tags)).into_response())
}

async fn detach_tag(
    State(state): State<AppState>,
    current: CurrentUser,
    AppPath((id, tag_id)): AppPath<(i64, i64)>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    PostService::new(&conn).detach_tag(id, current.user.id, tag_id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn like_post(
    State(state): State<AppState>,
    visitor: Visitor,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let (status, created) =
        EngagementService::new(&conn).like(LikeTarget::Post(id), &visitor.fingerprint)?;
    let code = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((code, Json(status)).into_response())
}

async fn unlike_post(
    State(state): State<AppState>,
    visitor: Visitor,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let status = EngagementService::new(&conn).unlike(LikeTarget::Post(id), &visitor.fingerprint)?;
    Ok((StatusCode::OK, Json(status)).into_response())
}

async fn record_view(
    State(state): State<AppState>,
    visitor: Visitor,
    headers: HeaderMap,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let context = ViewContext {
        referrer_url: headers
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        device_type: Some(device_type(&visitor.user_agent).to_string()),
    };

    let conn = state.db.get()?;
    let recorded = EngagementService::new(&conn).record_view(
        id,
        &visitor.fingerprint,
        &visitor.user_agent,
        &context,
    )?;
    Ok((StatusCode::CREATED, Json(recorded)).into_response())
}

async fn create_comment(
    State(state): State<AppState>,
    visitor: Visitor,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<CommentCreate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let comment = CommentService::new(&conn).create(id, &input, &visitor.fingerprint)?;
    Ok((StatusCode::CREATED, Json(comment)).into_response())
}

async fn list_comments(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppQuery(page): AppQuery<Pagination>,
) -> AppResult<Response> {
    let (skip, limit) = page.resolve(DEFAULT_COMMENT_LIMIT, MAX_LIMIT)?;
    let conn = state.db.get()?;
    let comments = CommentService::new(&conn).list_for_post(id, skip, limit)?;
    Ok((StatusCode::OK, Json(comments)).into_response())
}

fn device_type(user_agent: &str) -> &'static str {
    let ua = user_agent.to_ascii_lowercase();
    if ua.contains("ipad") || ua.contains("tablet") {
        "tablet"
    } else if ua.contains("mobi") || ua.contains("android") || ua.contains("iphone") {
        "mobile"
    } else {
        "desktop"
    }
}
