use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::Redirect;

pub struct RedirectRepository<'a> {
    conn: &'a Connection,
}

impl<'a> RedirectRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_old_slug(&self, old_slug: &str) -> rusqlite::Result<Option<Redirect>> {
        self.conn
            .query_row(
                "SELECT id, old_slug, new_slug, redirect_type, created_at, updated_at
                 FROM redirects WHERE old_slug = ?1",
                params![old_slug],
                map_redirect,
            )
            .optional()
    }

    /// Point `old_slug` at `new_slug`, replacing any earlier target.
    pub fn upsert(&self, old_slug: &str, new_slug: &str) -> rusqlite::Result<()> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO redirects (old_slug, new_slug, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(old_slug) DO UPDATE SET
               new_slug = excluded.new_slug,
               updated_at = excluded.updated_at",
            params![old_slug, new_slug, now],
        )?;
        Ok(())
    }

    /// Re-target every redirect that pointed at `from` so it points at `to`.
    pub fn retarget(&self, from: &str, to: &str) -> rusqlite::Result<usize> {
        self.conn.execute(
            "UPDATE redirects SET new_slug = ?1, updated_at = ?2 WHERE new_slug = ?3",
            params![to, Utc::now(), from],
        )
    }

    /// A slug that is live again must not redirect anywhere.
    pub fn delete_by_old_slug(&self, old_slug: &str) -> rusqlite::Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM redirects WHERE old_slug = ?1", params![old_slug])?;
        Ok(rows > 0)
    }

    /// Drop every redirect landing on `new_slug`.
    pub fn delete_by_new_slug(&self, new_slug: &str) -> rusqlite::Result<usize> {
        self.conn
            .execute("DELETE FROM redirects WHERE new_slug = ?1", params![new_slug])
    }
}

fn map_redirect(row: &Row<'_>) -> rusqlite::Result<Redirect> {
    Ok(Redirect {
        id: row.get("id")?,
        old_slug: row.get("old_slug")?,
        new_slug: row.get("new_slug")?,
        redirect_type: row.get("redirect_type")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::setup;

    #[test]
    fn upsert_replaces_target() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let repo = RedirectRepository::new(&conn);

        repo.upsert("a", "b").unwrap();
        repo.upsert("a", "c").unwrap();
        let r = repo.find_by_old_slug("a").unwrap().unwrap();
        assert_eq!(r.new_slug, "c");
        assert_eq!(r.redirect_type, "301");
    }

    #[test]
    fn retarget_collapses_chains() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let repo = RedirectRepository::new(&conn);

        repo.upsert("a", "b").unwrap();
        assert_eq!(repo.retarget("b", "c").unwrap(), 1);
        repo.upsert("b", "c").unwrap();
        assert_eq!(repo.find_by_old_slug("a").unwrap().unwrap().new_slug, "c");
        assert_eq!(repo.find_by_old_slug("b").unwrap().unwrap().new_slug, "c");
    }

    #[test]
    fn delete_by_new_slug_removes_only_matching_targets() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let repo = RedirectRepository::new(&conn);

        repo.upsert("a", "c").unwrap();
        repo.upsert("b", "c").unwrap();
        repo.upsert("x", "y").unwrap();
        assert_eq!(repo.delete_by_new_slug("c").unwrap(), 2);
        assert!(repo.find_by_old_slug("a").unwrap().is_none());
        assert!(repo.find_by_old_slug("x").unwrap().is_some());
    }
}
