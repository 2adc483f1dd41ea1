mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_post_likes_are_once_per_visitor() {
    let app = TestApp::new();
    let token = app.login_as("author@example.com").await;
    let id = app.published_post(&token, "likeable").await;
    let uri = format!("/posts/{id}/like");

    let first = app.as_visitor(Method::POST, &uri, "10.0.0.1", None).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body, json!({ "liked": true, "like_count": 1 }));

    let repeat = app.as_visitor(Method::POST, &uri, "10.0.0.1", None).await;
    assert_eq!(repeat.status, StatusCode::OK);
    assert_eq!(repeat.body["like_count"], 1);

    let other = app.as_visitor(Method::POST, &uri, "10.0.0.2", None).await;
    assert_eq!(other.status, StatusCode::CREATED);
    assert_eq!(other.body["like_count"], 2);

    let unliked = app.as_visitor(Method::DELETE, &uri, "10.0.0.1", None).await;
    assert_eq!(unliked.status, StatusCode::OK);
    assert_eq!(unliked.body, json!({ "liked": false, "like_count": 1 }));

    let unliked = app.as_visitor(Method::DELETE, &uri, "10.0.0.1", None).await;
    assert_eq!(unliked.body["like_count"], 1);

    assert_eq!(app.get(&format!("/posts/{id}")).await.body["like_count"], 1);
}

#[tokio::test]
async fn test_drafts_cannot_be_liked_or_viewed() {
    let app = TestApp::new();
    let token = app.login_as("author@example.com").await;
    let draft = app
        .request(
            Method::POST,
            "/posts",
            Some(&token),
            Some(json!({
                "title": "Unfinished",
                "slug": "unfinished",
                "content": "Still working on this one.",
            })),
        )
        .await;
    let id = draft.body["id"].as_i64().unwrap();

    let like = app
        .as_visitor(Method::POST, &format!("/posts/{id}/like"), "10.0.0.1", None)
        .await;
    assert_eq!(like.status, StatusCode::NOT_FOUND);

    let view = app
        .as_visitor(Method::POST, &format!("/posts/{id}/views"), "10.0.0.1", None)
        .await;
    assert_eq!(view.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_views_count_unique_visitors() {
    let app = TestApp::new();
    let token = app.login_as("author@example.com").await;
    let id = app.published_post(&token, "popular").await;
    let uri = format!("/posts/{id}/views");

    let first = app.as_visitor(Method::POST, &uri, "10.0.0.1", None).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body, json!({ "counted": true, "view_count": 1 }));

    let repeat = app.as_visitor(Method::POST, &uri, "10.0.0.1", None).await;
    assert_eq!(repeat.body, json!({ "counted": false, "view_count": 1 }));

    let other = app.as_visitor(Method::POST, &uri, "10.0.0.9", None).await;
    assert_eq!(other.body["view_count"], 2);
}

#[tokio::test]
async fn test_comment_moderation_flow() {
    let app = TestApp::new();
    let token = app.login_as("author@example.com").await;
    let id = app.published_post(&token, "discussed").await;
    let comments_uri = format!("/posts/{id}/comments");

    let submitted = app
        .as_visitor(
            Method::POST,
            &comments_uri,
            "10.0.0.1",
            Some(json!({
                "name": "Reader",
                "email": "reader@example.com",
                "content": "Great write-up!",
            })),
        )
        .await;
    assert_eq!(submitted.status, StatusCode::CREATED);
    assert_eq!(submitted.body["is_approved"], false);
    assert!(submitted.body.get("email").is_none());
    let comment_id = submitted.body["id"].as_i64().unwrap();

    // Unapproved comments are hidden from readers
    assert!(app.get(&comments_uri).await.body.as_array().unwrap().is_empty());

    assert_eq!(
        app.get("/comments/admin/pending").await.status,
        StatusCode::UNAUTHORIZED
    );
    let pending = app
        .request(Method::GET, "/comments/admin/pending", Some(&token), None)
        .await;
    assert_eq!(pending.body.as_array().unwrap().len(), 1);

    let approve_uri = format!("/comments/{comment_id}/approve");
    let approved = app
        .request(Method::PATCH, &approve_uri, Some(&token), None)
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.body["is_approved"], true);
    app.request(Method::PATCH, &approve_uri, Some(&token), None)
        .await;

    let listed = app.get(&comments_uri).await;
    assert_eq!(listed.body[0]["content"], "Great write-up!");
    assert_eq!(app.get(&format!("/posts/{id}")).await.body["comment_count"], 1);

    let reply = app
        .as_visitor(
            Method::POST,
            &comments_uri,
            "10.0.0.2",
            Some(json!({
                "name": "Author",
                "email": "author@example.com",
                "content": "Thanks!",
                "parent_id": comment_id,
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    let reply_id = reply.body["id"].as_i64().unwrap();
    app.request(
        Method::PATCH,
        &format!("/comments/{reply_id}/approve"),
        Some(&token),
        None,
    )
    .await;

    let replies = app.get(&format!("/comments/{comment_id}/replies")).await;
    assert_eq!(replies.body[0]["id"], reply_id);
    assert_eq!(app.get(&format!("/posts/{id}")).await.body["comment_count"], 2);

    let like = app
        .as_visitor(
            Method::POST,
            &format!("/comments/{comment_id}/like"),
            "10.0.0.3",
            None,
        )
        .await;
    assert_eq!(like.status, StatusCode::CREATED);
    assert_eq!(like.body["like_count"], 1);

    let deleted = app
        .request(Method::DELETE, &format!("/comments/{comment_id}"), Some(&token), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&format!("/posts/{id}")).await.body["comment_count"], 0);
    assert_eq!(
        app.get(&format!("/comments/{reply_id}/replies")).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_comment_validation() {
    let app = TestApp::new();
    let token = app.login_as("author@example.com").await;
    let id = app.published_post(&token, "strict").await;

    let bad_email = app
        .as_visitor(
            Method::POST,
            &format!("/posts/{id}/comments"),
            "10.0.0.1",
            Some(json!({ "name": "X", "email": "not-an-email", "content": "hi" })),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing_post = app
        .as_visitor(
            Method::POST,
            "/posts/999/comments",
            "10.0.0.1",
            Some(json!({ "name": "X", "email": "x@example.com", "content": "hi" })),
        )
        .await;
    assert_eq!(missing_post.status, StatusCode::NOT_FOUND);
}
