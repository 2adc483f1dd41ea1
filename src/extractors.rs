use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::auth::{client_ip, fingerprint_hash};
use crate::db::models::User;
use crate::error::AppError;
use crate::services::UserService;
use crate::state::AppState;

/// The authenticated caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Extractor that requires authentication.
/// Returns 401 unless the bearer token maps to an unexpired session of an active user.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        let conn = state.db.get()?;
        let user = UserService::new(&conn, &state.config.auth).authenticate(token)?;

        Ok(CurrentUser {
            user,
            token: token.to_string(),
        })
    }
}

/// Anonymous visitor identity for likes, views and comments.
#[derive(Debug, Clone)]
pub struct Visitor {
    pub fingerprint: String,
    pub user_agent: String,
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = |name: header::HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };
        let user_agent = header_value(header::USER_AGENT);
        let accept_language = header_value(header::ACCEPT_LANGUAGE);
        let ip = client_ip(
            &parts.headers,
            parts.extensions.get::<ConnectInfo<SocketAddr>>(),
        );

        Ok(Visitor {
            fingerprint: fingerprint_hash(&ip, &user_agent, &accept_language),
            user_agent,
        })
    }
}

/// `Json<T>` whose rejection is an `AppError`, so malformed bodies answer with `{"detail": ...}`.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

#[derive(Debug)]
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(AppPath(value))
    }
}

#[derive(Debug)]
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(AppQuery(value))
    }
}

fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_is_extracted() {
        let parts = parts_with(&[("authorization", "Bearer abc123")]);
        assert_eq!(extract_bearer_token(&parts), Some("abc123"));
        let parts = parts_with(&[("authorization", "bearer abc123")]);
        assert_eq!(extract_bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        for value in ["Basic Zm9vOmJhcg==", "Bearer", "Bearer   ", "abc123"] {
            let parts = parts_with(&[("authorization", value)]);
            assert_eq!(extract_bearer_token(&parts), None, "{value}");
        }
        assert_eq!(extract_bearer_token(&parts_with(&[])), None);
    }

    #[tokio::test]
    async fn visitor_fingerprint_depends_on_headers() {
        let mut a = parts_with(&[("user-agent", "curl/8"), ("x-forwarded-for", "1.1.1.1")]);
        let mut b = parts_with(&[("user-agent", "curl/8"), ("x-forwarded-for", "2.2.2.2")]);
        let mut c = parts_with(&[("user-agent", "curl/8"), ("x-forwarded-for", "1.1.1.1")]);

        let va = Visitor::from_request_parts(&mut a, &()).await.unwrap();
        let vb = Visitor::from_request_parts(&mut b, &()).await.unwrap();
        let vc = Visitor::from_request_parts(&mut c, &()).await.unwrap();
        assert_ne!(va.fingerprint, vb.fingerprint);
        assert_eq!(va.fingerprint, vc.fingerprint);
        assert_eq!(va.user_agent, "curl/8");
    }

    #[derive(Debug, serde::Deserialize)]
    struct Named {
        #[allow(dead_code)]
        name: String,
    }

    #[tokio::test]
    async fn json_rejection_becomes_validation_error() {
        let req = Request::builder()
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{}"))
            .unwrap();
        let err = AppJson::<Named>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("name")));
    }

    #[tokio::test]
    async fn query_rejection_becomes_validation_error() {
        let mut parts = Request::builder()
            .uri("/?limit=abc")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let err = AppQuery::<crate::schemas::Pagination>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
