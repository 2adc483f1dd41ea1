use chrono::Utc;
use rusqlite::{params, Connection};

/// The single entity a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post(i64),
    Comment(i64),
}

impl LikeTarget {
    fn column(self) -> &'static str {
        match self {
            LikeTarget::Post(_) => "post_id",
            LikeTarget::Comment(_) => "comment_id",
        }
    }

    fn id(self) -> i64 {
        match self {
            LikeTarget::Post(id) | LikeTarget::Comment(id) => id,
        }
    }
}

pub struct LikeRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LikeRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn exists(&self, target: LikeTarget, fingerprint: &str) -> rusqlite::Result<bool> {
        self.conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM likes WHERE {} = ?1 AND fingerprint_hash = ?2)",
                target.column()
            ),
            params![target.id(), fingerprint],
            |row| row.get(0),
        )
    }

    /// Returns false when this fingerprint already liked the target.
    pub fn insert(&self, target: LikeTarget, fingerprint: &str) -> rusqlite::Result<bool> {
        let rows = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO likes ({}, fingerprint_hash, created_at) VALUES (?1, ?2, ?3)",
                target.column()
            ),
            params![target.id(), fingerprint, Utc::now()],
        )?;
        Ok(rows > 0)
    }

    /// Returns false when there was no like to remove.
    pub fn delete(&self, target: LikeTarget, fingerprint: &str) -> rusqlite::Result<bool> {
        let rows = self.conn.execute(
            &format!(
                "DELETE FROM likes WHERE {} = ?1 AND fingerprint_hash = ?2",
                target.column()
            ),
            params![target.id(), fingerprint],
        )?;
        Ok(rows > 0)
    }
}
