use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::Media;
use crate::schemas::media::MediaCreate;

const MEDIA_COLUMNS: &str =
    "id, url, media_type, cdn_url, alt_text, caption, mime_type, size_bytes, created_at, updated_at";

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub struct MediaRepository<'a> {
    conn: &'a Connection,
}

impl<'a> MediaRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<Media>> {
        self.conn
            .query_row(
                &format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = ?1"),
                params![id],
                map_media,
            )
            .optional()
    }

    pub fn exists(&self, id: i64) -> rusqlite::Result<bool> {
        self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM media WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
    }

    pub fn list(&self, skip: i64, limit: i64) -> rusqlite::Result<Vec<Media>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media ORDER BY id DESC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(params![limit, skip], map_media)?;
        rows.collect()
    }

    pub fn insert(&self, input: &MediaCreate) -> rusqlite::Result<Media> {
        let now = Utc::now();
        self.conn.query_row(
            &format!(
                "INSERT INTO media (url, media_type, cdn_url, alt_text, caption, mime_type, size_bytes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                 RETURNING {MEDIA_COLUMNS}"
            ),
            params![
                input.url,
                input.media_type,
                input.cdn_url,
                input.alt_text,
                input.caption,
                input.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE),
                input.size_bytes.unwrap_or(0),
                now
            ],
            map_media,
        )
    }

    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM media WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

fn map_media(row: &Row<'_>) -> rusqlite::Result<Media> {
    Ok(Media {
        id: row.get("id")?,
        url: row.get("url")?,
        media_type: row.get("media_type")?,
        cdn_url: row.get("cdn_url")?,
        alt_text: row.get("alt_text")?,
        caption: row.get("caption")?,
        mime_type: row.get("mime_type")?,
        size_bytes: row.get("size_bytes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{insert_post, insert_user, setup};

    fn image() -> MediaCreate {
        MediaCreate {
            url: "https://cdn.example.com/a.png".into(),
            media_type: "image".into(),
            cdn_url: None,
            alt_text: Some("A".into()),
            caption: None,
            mime_type: None,
            size_bytes: None,
        }
    }

    #[test]
    fn insert_applies_defaults() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let repo = MediaRepository::new(&conn);
        let media = repo.insert(&image()).unwrap();
        assert_eq!(media.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(media.size_bytes, 0);
        assert!(repo.exists(media.id).unwrap());
        assert_eq!(repo.list(0, 10).unwrap().len(), 1);
    }

    #[test]
    fn deleting_media_nulls_post_images() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let author = insert_user(&conn, "a@example.com");
        let post = insert_post(&conn, author, "p", "draft");
        let repo = MediaRepository::new(&conn);
        let media = repo.insert(&image()).unwrap();
        conn.execute(
            "UPDATE blog_posts SET featured_image_id = ?1, og_image_id = ?1 WHERE id = ?2",
            params![media.id, post],
        )
        .unwrap();

        assert!(repo.delete(media.id).unwrap());
        let (featured, og): (Option<i64>, Option<i64>) = conn
            .query_row(
                "SELECT featured_image_id, og_image_id FROM blog_posts WHERE id = ?1",
                params![post],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!((featured, og), (None, None));
    }
}
