use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::Tag;

const TAG_COLUMNS: &str = "id, name, slug, created_at, updated_at";

pub struct TagRepository<'a> {
    conn: &'a Connection,
}

impl<'a> TagRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<Tag>> {
        self.conn
            .query_row(
                &format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = ?1"),
                params![id],
                map_tag,
            )
            .optional()
    }

    pub fn find_by_slug(&self, slug: &str) -> rusqlite::Result<Option<Tag>> {
        self.conn
            .query_row(
                &format!("SELECT {TAG_COLUMNS} FROM tags WHERE slug = ?1"),
                params![slug],
                map_tag,
            )
            .optional()
    }

    pub fn list(&self) -> rusqlite::Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY name ASC, id ASC"))?;
        let rows = stmt.query_map([], map_tag)?;
        rows.collect()
    }

    pub fn insert(&self, name: &str, slug: &str) -> rusqlite::Result<Tag> {
        let now = Utc::now();
        self.conn.query_row(
            &format!(
                "INSERT INTO tags (name, slug, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)
                 RETURNING {TAG_COLUMNS}"
            ),
            params![name, slug, now],
            map_tag,
        )
    }

    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM tags WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// Idempotent: attaching an already attached tag is a no-op.
    pub fn attach(&self, post_id: i64, tag_id: i64) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO post_tags (post_id, tag_id, created_at) VALUES (?1, ?2, ?3)",
            params![post_id, tag_id, Utc::now()],
        )?;
        Ok(())
    }

    pub fn detach(&self, post_id: i64, tag_id: i64) -> rusqlite::Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM post_tags WHERE post_id = ?1 AND tag_id = ?2",
            params![post_id, tag_id],
        )?;
        Ok(rows > 0)
    }

    pub fn tags_for_post(&self, post_id: i64) -> rusqlite::Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, t.slug, t.created_at, t.updated_at
             FROM tags t JOIN post_tags pt ON pt.tag_id = t.id
             WHERE pt.post_id = ?1
             ORDER BY t.name ASC, t.id ASC",
        )?;
        let rows = stmt.query_map(params![post_id], map_tag)?;
        rows.collect()
    }
}

fn map_tag(row: &Row<'_>) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
