use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::AppResult;
use crate::extractors::{AppJson, CurrentUser};
use crate::schemas::user::{TokenResponse, UserLogin, UserRegister};
use crate::services::UserService;
use crate::state::AppState;

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .route("/users/me", get(me))
}

// --- Handlers ---

async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<UserRegister>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let user = UserService::new(&conn, &state.config.auth).register(&input)?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<UserLogin>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let token = UserService::new(&conn, &state.config.auth).login(&input)?;
    Ok((StatusCode::OK, Json(TokenResponse::bearer(token))).into_response())
}

async fn logout(State(state): State<AppState>, current: CurrentUser) -> AppResult<Response> {
    let conn = state.db.get()?;
    UserService::new(&conn, &state.config.auth).logout(&current.token)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn me(current: CurrentUser) -> AppResult<Response> {
    Ok((StatusCode::OK, Json(current.user)).into_response())
}
