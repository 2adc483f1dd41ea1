pub mod categories;
pub mod comments;
pub mod health;
pub mod media;
pub mod newsletter;
pub mod posts;
pub mod tags;
pub mod topic_clusters;
pub mod users;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(categories::router())
        .merge(topic_clusters::router())
        .merge(posts::router())
        .merge(comments::router())
        .merge(tags::router())
        .merge(media::router())
        .merge(newsletter::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
