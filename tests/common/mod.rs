#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use dataflow::config::{AuthConfig, Config};
use dataflow::db;
use dataflow::routes;
use dataflow::state::AppState;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A fully wired router over a throwaway database.
pub struct TestApp {
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let pool = db::create_pool(&dir.path().join("test.db")).expect("Failed to create test database");
        db::run_migrations(&pool).expect("Failed to run migrations");

        let config = Config {
            auth: AuthConfig {
                session_hours: 1,
                bcrypt_cost: 4,
            },
            ..Config::default()
        };
        let router = routes::app(AppState { db: pool, config });
        Self { router, _dir: dir }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    /// Same request as an anonymous visitor coming from `ip`.
    pub async fn as_visitor(&self, method: Method, uri: &str, ip: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", ip)
            .header(header::USER_AGENT, "integration-test/1.0");
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Register and log in, returning a bearer token.
    pub async fn login_as(&self, email: &str) -> String {
        let registered = self
            .post_json(
                "/users/register",
                json!({ "email": email, "password": "correct horse battery" }),
            )
            .await;
        assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);

        let login = self
            .post_json(
                "/users/login",
                json!({ "email": email, "password": "correct horse battery" }),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
        login.body["access_token"].as_str().unwrap().to_string()
    }

    /// Create a draft and publish it, returning the post id.
    pub async fn published_post(&self, token: &str, slug: &str) -> i64 {
        let created = self
            .request(
                Method::POST,
                "/posts",
                Some(token),
                Some(json!({
                    "title": format!("Post {slug}"),
                    "slug": slug,
                    "content": "A body that is long enough to pass validation.",
                })),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
        let id = created.body["id"].as_i64().unwrap();

        let published = self
            .request(Method::PATCH, &format!("/posts/{id}/publish"), Some(token), None)
            .await;
        assert_eq!(published.status, StatusCode::OK, "{:?}", published.body);
        id
    }
}
