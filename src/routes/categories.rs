use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::AppResult;
use crate::extractors::{AppJson, AppPath, AppQuery};
use crate::schemas::category::{CategoryCreate, CategoryUpdate};
use crate::schemas::Pagination;
use crate::services::CategoryService;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 100;

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/tree", get(category_forest))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/categories/{id}/tree", get(category_tree))
}

// --- Handlers ---

async fn create_category(
    State(state): State<AppState>,
    AppJson(input): AppJson<CategoryCreate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let category = CategoryService::new(&conn).create(&input)?;
    Ok((StatusCode::CREATED, Json(category)).into_response())
}

async fn list_categories(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Pagination>,
) -> AppResult<Response> {
    let (skip, limit) = page.resolve(DEFAULT_LIMIT, MAX_LIMIT)?;
    let conn = state.db.get()?;
    let categories = CategoryService::new(&conn).list_top_level(skip, limit)?;
    Ok((StatusCode::OK, Json(categories)).into_response())
}

async fn category_forest(State(state): State<AppState>) -> AppResult<Response> {
    let conn = state.db.get()?;
    let forest = CategoryService::new(&conn).list_top_level_with_children()?;
    Ok((StatusCode::OK, Json(forest)).into_response())
}

async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let category = CategoryService::new(&conn).get(id)?;
    Ok((StatusCode::OK, Json(category)).into_response())
}

async fn category_tree(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let tree = CategoryService::new(&conn).get_with_children(id)?;
    Ok((StatusCode::OK, Json(tree)).into_response())
}

async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<CategoryUpdate>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let category = CategoryService::new(&conn).update(id, &input)?;
    Ok((StatusCode::OK, Json(category)).into_response())
}

async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let name = CategoryService::new(&conn).delete(id)?;
    let message = format!("Category '{name}' deleted successfully");
    Ok((StatusCode::OK, Json(json!({ "message": message }))).into_response())
}
