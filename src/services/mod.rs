//! Business rules over the repositories. Each service borrows the request's
//! pooled connection and reports domain failures as [`ServiceError`].

pub mod category;
pub mod comment;
pub mod engagement;
pub mod media;
pub mod newsletter;
pub mod post;
pub mod tag;
pub mod topic_cluster;
pub mod user;

pub use category::CategoryService;
pub use comment::CommentService;
pub use engagement::EngagementService;
pub use media::MediaService;
pub use newsletter::NewsletterService;
pub use post::{PostService, SlugLookup};
pub use tag::TagService;
pub use topic_cluster::TopicClusterService;
pub use user::UserService;

use thiserror::Error;

use crate::repositories::is_unique_violation;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness failure reported as 409.
    #[error("{0}")]
    Conflict(String),

    /// Uniqueness failure reported as a bad request.
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InactiveAccount(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a constraint violation that slipped past a pre-check to the same
/// error the pre-check would have produced.
pub(crate) fn on_unique<T>(
    result: rusqlite::Result<T>,
    err: impl FnOnce() -> ServiceError,
) -> ServiceResult<T> {
    result.map_err(|e| {
        if is_unique_violation(&e) {
            err()
        } else {
            ServiceError::Database(e)
        }
    })
}
