use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::Category;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, parent_id, created_at, updated_at";

pub struct CategoryRepository<'a> {
    conn: &'a Connection,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<Category>> {
        self.conn
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
                params![id],
                map_category,
            )
            .optional()
    }

    pub fn find_by_slug(&self, slug: &str) -> rusqlite::Result<Option<Category>> {
        self.conn
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = ?1"),
                params![slug],
                map_category,
            )
            .optional()
    }

    pub fn exists(&self, id: i64) -> rusqlite::Result<bool> {
        self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
    }

    pub fn insert(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        parent_id: Option<i64>,
    ) -> rusqlite::Result<Category> {
        let now = Utc::now();
        self.conn.query_row(
            &format!(
                "INSERT INTO categories (name, slug, description, parent_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 RETURNING {CATEGORY_COLUMNS}"
            ),
            params![name, slug, description, parent_id, now],
            map_category,
        )
    }

    /// Top-level categories (no parent), ascending id.
    pub fn list_top_level(&self, skip: i64, limit: i64) -> rusqlite::Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE parent_id IS NULL
             ORDER BY id ASC
             LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(params![limit, skip], map_category)?;
        rows.collect()
    }

    /// Direct children of a category, ascending id.
    pub fn children_of(&self, parent_id: i64) -> rusqlite::Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE parent_id = ?1 ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map(params![parent_id], map_category)?;
        rows.collect()
    }

    pub fn count_children(&self, parent_id: i64) -> rusqlite::Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE parent_id = ?1",
            params![parent_id],
            |row| row.get(0),
        )
    }

    pub fn parent_id_of(&self, id: i64) -> rusqlite::Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT parent_id FROM categories WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map(Option::flatten)
    }

    /// Persist every mutable field of `category` and bump `updated_at`.
    pub fn update(&self, category: &Category) -> rusqlite::Result<Category> {
        self.conn.query_row(
            &format!(
                "UPDATE categories
                 SET name = ?1, slug = ?2, description = ?3, parent_id = ?4, updated_at = ?5
                 WHERE id = ?6
                 RETURNING {CATEGORY_COLUMNS}"
            ),
            params![
                category.name,
                category.slug,
                category.description,
                category.parent_id,
                Utc::now(),
                category.id
            ],
            map_category,
        )
    }

    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

fn map_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get("id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        description: row.get("description")?,
        parent_id: row.get("parent_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
