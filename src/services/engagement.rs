use rusqlite::Connection;

use super::{ServiceError, ServiceResult};
use crate::db::models::PostStatus;
use crate::repositories::post::PostCounter;
use crate::repositories::post_view::NewPostView;
use crate::repositories::{
    CommentRepository, LikeRepository, LikeTarget, PostRepository, PostViewRepository,
};
use crate::schemas::engagement::{LikeStatus, ViewContext, ViewRecorded};

const DEFAULT_REFERRER: &str = "direct";
const DEFAULT_DEVICE: &str = "desktop";

/// Anonymous likes and views, keyed by visitor fingerprint.
pub struct EngagementService<'a> {
    conn: &'a Connection,
}

impl<'a> EngagementService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the resulting state and whether a new like was recorded.
    pub fn like(&self, target: LikeTarget, fingerprint: &str) -> ServiceResult<(LikeStatus, bool)> {
        self.require_target(target)?;

        let tx = self.conn.unchecked_transaction()?;
        let likes = LikeRepository::new(&tx);
        let created = !likes.exists(target, fingerprint)? && likes.insert(target, fingerprint)?;
        let like_count = if created {
            adjust_like_count(&tx, target, 1)?
        } else {
            current_like_count(&tx, target)?
        };
        tx.commit()?;

        if created {
            tracing::debug!(?target, "Recorded like");
        }
        Ok((
            LikeStatus {
                liked: true,
                like_count,
            },
            created,
        ))
    }

    /// Idempotent: unliking something never liked leaves the count alone.
    pub fn unlike(&self, target: LikeTarget, fingerprint: &str) -> ServiceResult<LikeStatus> {
        self.require_target(target)?;

        let tx = self.conn.unchecked_transaction()?;
        let removed = LikeRepository::new(&tx).delete(target, fingerprint)?;
        let like_count = if removed {
            adjust_like_count(&tx, target, -1)?
        } else {
            current_like_count(&tx, target)?
        };
        tx.commit()?;

        Ok(LikeStatus {
            liked: false,
            like_count,
        })
    }

    /// Every view is logged; the post's view_count only moves on a fingerprint's first view.
    pub fn record_view(
        &self,
        post_id: i64,
        fingerprint: &str,
        user_agent: &str,
        input: &ViewContext,
    ) -> ServiceResult<ViewRecorded> {
        self.require_published_post(post_id)?;

        let tx = self.conn.unchecked_transaction()?;
        let views = PostViewRepository::new(&tx);
        let first_view = !views.has_viewed(post_id, fingerprint)?;
        views.insert(&NewPostView {
            post_id,
            fingerprint_hash: fingerprint,
            referrer_url: input.referrer_url.as_deref().unwrap_or(DEFAULT_REFERRER),
            user_agent,
            device_type: input.device_type.as_deref().unwrap_or(DEFAULT_DEVICE),
        })?;
        let view_count = PostRepository::new(&tx).adjust_counter(
            post_id,
            PostCounter::Views,
            i64::from(first_view),
        )?;
        tx.commit()?;

        Ok(ViewRecorded {
            counted: first_view,
            view_count,
        })
    }

    fn require_target(&self, target: LikeTarget) -> ServiceResult<()> {
        match target {
            LikeTarget::Post(id) => self.require_published_post(id),
            LikeTarget::Comment(id) => match CommentRepository::new(self.conn).find_by_id(id)? {
                Some(_) => Ok(()),
                None => Err(ServiceError::NotFound("Comment not found".into())),
            },
        }
    }

    fn require_published_post(&self, id: i64) -> ServiceResult<()> {
        match PostRepository::new(self.conn).find_by_id(id)? {
            Some(post) if post.status == PostStatus::Published => Ok(()),
            _ => Err(ServiceError::NotFound("Post not found".into())),
        }
    }
}

fn adjust_like_count(conn: &Connection, target: LikeTarget, delta: i64) -> rusqlite::Result<i64> {
    match target {
        LikeTarget::Post(id) => PostRepository::new(conn).adjust_counter(id, PostCounter::Likes, delta),
        LikeTarget::Comment(id) => CommentRepository::new(conn).adjust_like_count(id, delta),
    }
}

fn current_like_count(conn: &Connection, target: LikeTarget) -> rusqlite::Result<i64> {
    adjust_like_count(conn, target, 0)
}
