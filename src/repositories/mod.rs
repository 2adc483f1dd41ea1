// Repository layer - every SQL statement lives here, no business rules.

pub mod category;
pub mod comment;
pub mod like;
pub mod media;
pub mod newsletter;
pub mod post;
pub mod post_view;
pub mod redirect;
pub mod tag;
pub mod topic_cluster;
pub mod user;

pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use like::{LikeRepository, LikeTarget};
pub use media::MediaRepository;
pub use newsletter::NewsletterRepository;
pub use post::PostRepository;
pub use post_view::PostViewRepository;
pub use redirect::RedirectRepository;
pub use tag::TagRepository;
pub use topic_cluster::TopicClusterRepository;
pub use user::UserRepository;

use rusqlite::ffi;

/// True when the error is a UNIQUE or PRIMARY KEY constraint violation.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use rusqlite::params;
    use tempfile::TempDir;

    use crate::db;
    use crate::state::DbPool;

    pub fn setup() -> (DbPool, TempDir) {
        let tmp = TempDir::new().unwrap();
        let pool = db::create_pool(&tmp.path().join("test.db")).unwrap();
        db::run_migrations(&pool).unwrap();
        (pool, tmp)
    }

    /// Insert a bare user row and return its id.
    pub fn insert_user(conn: &rusqlite::Connection, email: &str) -> i64 {
        conn.execute(
            "INSERT INTO users (name, email, password_hash, created_at, updated_at)
             VALUES ('Test', ?1, 'x', ?2, ?2)",
            params![email, Utc::now()],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    /// Insert a post with the given slug and status and return its id.
    pub fn insert_post(conn: &rusqlite::Connection, author_id: i64, slug: &str, status: &str) -> i64 {
        let now = Utc::now();
        let published_at = (status == "published").then_some(now);
        conn.execute(
            "INSERT INTO blog_posts (author_id, title, slug, content, status, published_at, created_at, updated_at)
             VALUES (?1, 'Title', ?2, 'Some content here', ?3, ?4, ?5, ?5)",
            params![author_id, slug, status, published_at, now],
        )
        .unwrap();
        conn.last_insert_rowid()
    }
}
