use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::Comment;

const COMMENT_COLUMNS: &str = "id, post_id, parent_id, name, email, fingerprint_hash, content, \
     is_approved, like_count, created_at, updated_at";

pub struct NewComment<'a> {
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub name: &'a str,
    pub email: &'a str,
    pub fingerprint_hash: &'a str,
    pub content: &'a str,
}

pub struct CommentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> CommentRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<Comment>> {
        self.conn
            .query_row(
                &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
                params![id],
                map_comment,
            )
            .optional()
    }

    /// New comments always start unapproved.
    pub fn insert(&self, comment: &NewComment<'_>) -> rusqlite::Result<Comment> {
        let now = Utc::now();
        self.conn.query_row(
            &format!(
                "INSERT INTO comments (post_id, parent_id, name, email, fingerprint_hash, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                 RETURNING {COMMENT_COLUMNS}"
            ),
            params![
                comment.post_id,
                comment.parent_id,
                comment.name,
                comment.email,
                comment.fingerprint_hash,
                comment.content,
                now
            ],
            map_comment,
        )
    }

    /// Approved top-level comments on a post, oldest first.
    pub fn list_approved_for_post(
        &self,
        post_id: i64,
        skip: i64,
        limit: i64,
    ) -> rusqlite::Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE post_id = ?1 AND parent_id IS NULL AND is_approved = 1
             ORDER BY created_at ASC, id ASC
             LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt.query_map(params![post_id, limit, skip], map_comment)?;
        rows.collect()
    }

    pub fn list_approved_replies(&self, parent_id: i64) -> rusqlite::Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE parent_id = ?1 AND is_approved = 1
             ORDER BY created_at ASC, id ASC"
        ))?;
        let rows = stmt.query_map(params![parent_id], map_comment)?;
        rows.collect()
    }

    pub fn list_pending(&self) -> rusqlite::Result<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
             WHERE is_approved = 0
             ORDER BY created_at ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], map_comment)?;
        rows.collect()
    }

    pub fn approve(&self, id: i64) -> rusqlite::Result<Comment> {
        self.conn.query_row(
            &format!(
                "UPDATE comments SET is_approved = 1, updated_at = ?1
                 WHERE id = ?2
                 RETURNING {COMMENT_COLUMNS}"
            ),
            params![Utc::now(), id],
            map_comment,
        )
    }

    /// Approved comments in the subtree rooted at `id`, the root included.
    pub fn count_approved_in_thread(&self, id: i64) -> rusqlite::Result<i64> {
        self.conn.query_row(
            "WITH RECURSIVE thread(id) AS (
                 SELECT id FROM comments WHERE id = ?1
                 UNION ALL
                 SELECT c.id FROM comments c JOIN thread t ON c.parent_id = t.id
             )
             SELECT COUNT(*) FROM comments
             WHERE id IN (SELECT id FROM thread) AND is_approved = 1",
            params![id],
            |row| row.get(0),
        )
    }

    /// Add `delta` to the like counter, never going below zero. Returns the new value.
    pub fn adjust_like_count(&self, id: i64, delta: i64) -> rusqlite::Result<i64> {
        self.conn.query_row(
            "UPDATE comments SET like_count = MAX(like_count + ?1, 0)
             WHERE id = ?2
             RETURNING like_count",
            params![delta, id],
            |row| row.get(0),
        )
    }

    /// Replies go with their parent through the cascading foreign key.
    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        post_id: row.get("post_id")?,
        parent_id: row.get("parent_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        fingerprint_hash: row.get("fingerprint_hash")?,
        content: row.get("content")?,
        is_approved: row.get("is_approved")?,
        like_count: row.get("like_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
