use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::TopicCluster;

const CLUSTER_COLUMNS: &str = "id, name, slug, pillar_post_id, created_at, updated_at";

pub struct TopicClusterRepository<'a> {
    conn: &'a Connection,
}

impl<'a> TopicClusterRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<TopicCluster>> {
        self.conn
            .query_row(
                &format!("SELECT {CLUSTER_COLUMNS} FROM topic_clusters WHERE id = ?1"),
                params![id],
                map_cluster,
            )
            .optional()
    }

    pub fn find_by_slug(&self, slug: &str) -> rusqlite::Result<Option<TopicCluster>> {
        self.conn
            .query_row(
                &format!("SELECT {CLUSTER_COLUMNS} FROM topic_clusters WHERE slug = ?1"),
                params![slug],
                map_cluster,
            )
            .optional()
    }

    pub fn exists(&self, id: i64) -> rusqlite::Result<bool> {
        self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM topic_clusters WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
    }

    pub fn list(&self, skip: i64, limit: i64) -> rusqlite::Result<Vec<TopicCluster>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CLUSTER_COLUMNS} FROM topic_clusters ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(params![limit, skip], map_cluster)?;
        rows.collect()
    }

    pub fn insert(
        &self,
        name: &str,
        slug: &str,
        pillar_post_id: Option<i64>,
    ) -> rusqlite::Result<TopicCluster> {
        let now = Utc::now();
        self.conn.query_row(
            &format!(
                "INSERT INTO topic_clusters (name, slug, pillar_post_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 RETURNING {CLUSTER_COLUMNS}"
            ),
            params![name, slug, pillar_post_id, now],
            map_cluster,
        )
    }

    pub fn update(&self, cluster: &TopicCluster) -> rusqlite::Result<TopicCluster> {
        self.conn.query_row(
            &format!(
                "UPDATE topic_clusters
                 SET name = ?1, slug = ?2, pillar_post_id = ?3, updated_at = ?4
                 WHERE id = ?5
                 RETURNING {CLUSTER_COLUMNS}"
            ),
            params![
                cluster.name,
                cluster.slug,
                cluster.pillar_post_id,
                Utc::now(),
                cluster.id
            ],
            map_cluster,
        )
    }

    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM topic_clusters WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

fn map_cluster(row: &Row<'_>) -> rusqlite::Result<TopicCluster> {
    Ok(TopicCluster {
        id: row.get("id")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        pillar_post_id: row.get("pillar_post_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
