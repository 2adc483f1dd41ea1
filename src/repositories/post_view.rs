use chrono::Utc;
use rusqlite::{params, Connection};

pub struct NewPostView<'a> {
    pub post_id: i64,
    pub fingerprint_hash: &'a str,
    pub referrer_url: &'a str,
    pub user_agent: &'a str,
    pub device_type: &'a str,
}

pub struct PostViewRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PostViewRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn has_viewed(&self, post_id: i64, fingerprint: &str) -> rusqlite::Result<bool> {
        self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM post_views WHERE post_id = ?1 AND fingerprint_hash = ?2)",
            params![post_id, fingerprint],
            |row| row.get(0),
        )
    }

    pub fn insert(&self, view: &NewPostView<'_>) -> rusqlite::Result<i64> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO post_views (post_id, fingerprint_hash, referrer_url, user_agent, device_type,
                                     started_at, ended_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, ?6)",
            params![
                view.post_id,
                view.fingerprint_hash,
                view.referrer_url,
                view.user_agent,
                view.device_type,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    #[cfg(test)]
    pub fn count_for_post(&self, post_id: i64) -> rusqlite::Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM post_views WHERE post_id = ?1",
            params![post_id],
            |row| row.get(0),
        )
    }
}
