use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::NewsletterSubscriber;

pub struct NewsletterRepository<'a> {
    conn: &'a Connection,
}

impl<'a> NewsletterRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_email(&self, email: &str) -> rusqlite::Result<Option<NewsletterSubscriber>> {
        self.conn
            .query_row(
                "SELECT id, email, source_page, created_at FROM newsletter_subscribers WHERE email = ?1",
                params![email],
                map_subscriber,
            )
            .optional()
    }

    pub fn insert(&self, email: &str, source_page: &str) -> rusqlite::Result<NewsletterSubscriber> {
        self.conn.query_row(
            "INSERT INTO newsletter_subscribers (email, source_page, created_at) VALUES (?1, ?2, ?3)
             RETURNING id, email, source_page, created_at",
            params![email, source_page, Utc::now()],
            map_subscriber,
        )
    }

    pub fn delete_by_email(&self, email: &str) -> rusqlite::Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM newsletter_subscribers WHERE email = ?1",
            params![email],
        )?;
        Ok(rows > 0)
    }
}

fn map_subscriber(row: &Row<'_>) -> rusqlite::Result<NewsletterSubscriber> {
    Ok(NewsletterSubscriber {
        id: row.get("id")?,
        email: row.get("email")?,
        source_page: row.get("source_page")?,
        created_at: row.get("created_at")?,
    })
}
