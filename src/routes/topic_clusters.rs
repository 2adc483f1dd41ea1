use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::schemas::topic_cluster::{TopicClusterCreate, TopicClusterUpdate};
use crate::schemas::Pagination;
use crate::services::TopicClusterService;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/topic-clusters", get(list_clusters).post(create_cluster))
        .route("/topic-clusters/", get(list_clusters).post(create_cluster))
        .route("/topic-clusters/slug/{slug}", get(get_cluster_by_slug))
        .route(
            "/topic-clusters/{id}",
            get(get_cluster).put(update_cluster).delete(delete_cluster),
        )
}

// --- Handlers ---

async fn create_cluster(
    State(state): State<AppState>,
    AppJson(input): AppJson<TopicClusterCreate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let cluster = TopicClusterService::new(&conn).create(&input)?;
    Ok((StatusCode::CREATED, Json(cluster)).into_response())
}

async fn list_clusters(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> AppResult<Response> {
    let (skip, limit) = page.resolve(DEFAULT_LIMIT, MAX_LIMIT)?;
    let conn = state.db.get()?;
    let clusters = TopicClusterService::new(&conn).list(skip, limit)?;
    Ok((StatusCode::OK, Json(clusters)).into_response())
}

async fn get_cluster(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let cluster = TopicClusterService::new(&conn).get(id)?;
    Ok((StatusCode::OK, Json(cluster)).into_response())
}

async fn get_cluster_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let cluster = TopicClusterService::new(&conn).get_by_slug(&slug)?;
    Ok((StatusCode::OK, Json(cluster)).into_response())
}

async fn update_cluster(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<TopicClusterUpdate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let cluster = TopicClusterService::new(&conn).update(id, &input)?;
    Ok((StatusCode::OK, Json(cluster)).into_response())
}

async fn delete_cluster(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    TopicClusterService::new(&conn).delete(id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
