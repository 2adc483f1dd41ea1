use rusqlite::Connection;

use super::{ServiceError, ServiceResult};
use crate::db::models::{Comment, PostStatus};
use crate::repositories::comment::NewComment;
use crate::repositories::post::PostCounter;
use crate::repositories::{CommentRepository, PostRepository};
use crate::schemas::comment::CommentCreate;

pub struct CommentService<'a> {
    conn: &'a Connection,
    repo: CommentRepository<'a>,
}

impl<'a> CommentService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            repo: CommentRepository::new(conn),
        }
    }

    /// Comments land unapproved and only on published posts.
    pub fn create(
        &self,
        post_id: i64,
        input: &CommentCreate,
        fingerprint: &str,
    ) -> ServiceResult<Comment> {
        input.validate()?;
        self.require_published_post(post_id)?;

        if let Some(parent_id) = input.parent_id {
            let parent = self.get(parent_id)?;
            if parent.post_id != post_id {
                return Err(ServiceError::InvalidState(
                    "Parent comment belongs to a different post".into(),
                ));
            }
        }

        let comment = self.repo.insert(&NewComment {
            post_id,
            parent_id: input.parent_id,
            name: &input.name,
            email: &input.email,
            fingerprint_hash: fingerprint,
            content: &input.content,
        })?;
        tracing::info!(comment_id = comment.id, post_id, "Comment submitted for moderation");
        Ok(comment)
    }

    pub fn get(&self, id: i64) -> ServiceResult<Comment> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::NotFound("Comment not found".into()))
    }

    pub fn list_for_post(&self, post_id: i64, skip: i64, limit: i64) -> ServiceResult<Vec<Comment>> {
        self.require_published_post(post_id)?;
        Ok(self.repo.list_approved_for_post(post_id, skip, limit)?)
    }

    pub fn replies(&self, id: i64) -> ServiceResult<Vec<Comment>> {
        self.get(id)?;
        Ok(self.repo.list_approved_replies(id)?)
    }

    pub fn pending(&self) -> ServiceResult<Vec<Comment>> {
        Ok(self.repo.list_pending()?)
    }

    /// Approving twice is a no-op; the post counter only moves on the first approval.
    pub fn approve(&self, id: i64) -> ServiceResult<Comment> {
        let comment = self.get(id)?;
        if comment.is_approved {
            return Ok(comment);
        }

        let tx = self.conn.unchecked_transaction()?;
        let approved = CommentRepository::new(&tx).approve(id)?;
        PostRepository::new(&tx).adjust_counter(comment.post_id, PostCounter::Comments, 1)?;
        tx.commit()?;

        tracing::info!(comment_id = id, "Approved comment");
        Ok(approved)
    }

    /// Removes the comment and its replies, uncounting every approved one.
    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        let comment = self.get(id)?;

        let tx = self.conn.unchecked_transaction()?;
        let comments = CommentRepository::new(&tx);
        let approved = comments.count_approved_in_thread(id)?;
        comments.delete(id)?;
        if approved > 0 {
            PostRepository::new(&tx).adjust_counter(
                comment.post_id,
                PostCounter::Comments,
                -approved,
            )?;
        }
        tx.commit()?;

        tracing::info!(comment_id = id, "Deleted comment");
        Ok(())
    }

    fn require_published_post(&self, post_id: i64) -> ServiceResult<()> {
        match PostRepository::new(self.conn).find_by_id(post_id)? {
            Some(post) if post.status == PostStatus::Published => Ok(()),
            _ => Err(ServiceError::NotFound("Post not found".into())),
        }
    }
}
