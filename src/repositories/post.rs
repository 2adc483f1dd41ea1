use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{BlogPost, PostStatus};
use crate::schemas::post::PostCreate;

const POST_COLUMNS: &str = "id, author_id, category_id, topic_cluster_id, featured_image_id, og_image_id, \
     title, slug, content, excerpt, status, published_at, scheduled_at, \
     meta_description, meta_keywords, canonical_url, og_title, og_description, twitter_card_type, \
     view_count, like_count, comment_count, share_count, created_at, updated_at";

/// Counter columns that engagement operations adjust in place.
#[derive(Debug, Clone, Copy)]
pub enum PostCounter {
    Views,
    Likes,
    Comments,
}

impl PostCounter {
    fn column(self) -> &'static str {
        match self {
            PostCounter::Views => "view_count",
            PostCounter::Likes => "like_count",
            PostCounter::Comments => "comment_count",
        }
    }
}

pub struct PostRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PostRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<BlogPost>> {
        self.conn
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE id = ?1"),
                params![id],
                map_post,
            )
            .optional()
    }

    /// Any status; callers decide what is visible.
    pub fn find_by_slug(&self, slug: &str) -> rusqlite::Result<Option<BlogPost>> {
        self.conn
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = ?1"),
                params![slug],
                map_post,
            )
            .optional()
    }

    pub fn exists(&self, id: i64) -> rusqlite::Result<bool> {
        self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM blog_posts WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
    }

    pub fn insert(&self, author_id: i64, input: &PostCreate) -> rusqlite::Result<BlogPost> {
        let now = Utc::now();
        self.conn.query_row(
            &format!(
                "INSERT INTO blog_posts (
                    author_id, category_id, topic_cluster_id, featured_image_id, og_image_id,
                    title, slug, content, excerpt, status,
                    meta_description, meta_keywords, canonical_url,
                    og_title, og_description, twitter_card_type,
                    created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)
                 RETURNING {POST_COLUMNS}"
            ),
            params![
                author_id,
                input.category_id,
                input.topic_cluster_id,
                input.featured_image_id,
                input.og_image_id,
                input.title,
                input.slug,
                input.content,
                input.excerpt,
                PostStatus::Draft,
                input.meta_description,
                input.meta_keywords,
                input.canonical_url,
                input.og_title,
                input.og_description,
                input.twitter_card_type,
                now
            ],
            map_post,
        )
    }

    /// Published posts, newest publication first.
    pub fn list_published(&self, skip: i64, limit: i64) -> rusqlite::Result<Vec<BlogPost>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts
             WHERE status = ?1
             ORDER BY published_at DESC, id DESC
             LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt.query_map(params![PostStatus::Published, limit, skip], map_post)?;
        rows.collect()
    }

    pub fn list_drafts(&self, author_id: i64) -> rusqlite::Result<Vec<BlogPost>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts
             WHERE status = ?1 AND author_id = ?2
             ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![PostStatus::Draft, author_id], map_post)?;
        rows.collect()
    }

    /// Persist the editable fields of `post` and bump `updated_at`.
    pub fn update(&self, post: &BlogPost) -> rusqlite::Result<BlogPost> {
        self.conn.query_row(
            &format!(
                "UPDATE blog_posts SET
                    category_id = ?1, topic_cluster_id = ?2, featured_image_id = ?3, og_image_id = ?4,
                    title = ?5, slug = ?6, content = ?7, excerpt = ?8,
                    meta_description = ?9, meta_keywords = ?10, canonical_url = ?11,
                    og_title = ?12, og_description = ?13, twitter_card_type = ?14,
                    updated_at = ?15
                 WHERE id = ?16
                 RETURNING {POST_COLUMNS}"
            ),
            params![
                post.category_id,
                post.topic_cluster_id,
                post.featured_image_id,
                post.og_image_id,
                post.title,
                post.slug,
                post.content,
                post.excerpt,
                post.meta_description,
                post.meta_keywords,
                post.canonical_url,
                post.og_title,
                post.og_description,
                post.twitter_card_type,
                Utc::now(),
                post.id
            ],
            map_post,
        )
    }

    pub fn mark_published(&self, id: i64) -> rusqlite::Result<BlogPost> {
        let now = Utc::now();
        self.conn.query_row(
            &format!(
                "UPDATE blog_posts SET status = ?1, published_at = ?2, updated_at = ?2
                 WHERE id = ?3
                 RETURNING {POST_COLUMNS}"
            ),
            params![PostStatus::Published, now, id],
            map_post,
        )
    }

    /// Add `delta` to a counter, never going below zero. Returns the new value.
    pub fn adjust_counter(&self, id: i64, counter: PostCounter, delta: i64) -> rusqlite::Result<i64> {
        let column = counter.column();
        self.conn.query_row(
            &format!(
                "UPDATE blog_posts SET {column} = MAX({column} + ?1, 0)
                 WHERE id = ?2
                 RETURNING {column}"
            ),
            params![delta, id],
            |row| row.get(0),
        )
    }

    pub fn delete(&self, id: i64) -> rusqlite::Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM blog_posts WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}

fn map_post(row: &Row<'_>) -> rusqlite::Result<BlogPost> {
    Ok(BlogPost {
        id: row.get("id")?,
        author_id: row.get("author_id")?,
        category_id: row.get("category_id")?,
        topic_cluster_id: row.get("topic_cluster_id")?,
        featured_image_id: row.get("featured_image_id")?,
        og_image_id: row.get("og_image_id")?,
        title: row.get("title")?,
        slug: row.get("slug")?,
        content: row.get("content")?,
        excerpt: row.get("excerpt")?,
        status: row.get("status")?,
        published_at: row.get("published_at")?,
        scheduled_at: row.get("scheduled_at")?,
        meta_description: row.get("meta_description")?,
        meta_keywords: row.get("meta_keywords")?,
        canonical_url: row.get("canonical_url")?,
        og_title: row.get("og_title")?,
        og_description: row.get("og_description")?,
        twitter_card_type: row.get("twitter_card_type")?,
        view_count: row.get("view_count")?,
        like_count: row.get("like_count")?,
        comment_count: row.get("comment_count")?,
        share_count: row.get("share_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{insert_post, insert_user, setup};

    fn new_post(slug: &str) -> PostCreate {
        PostCreate {
            title: "Hello".into(),
            slug: slug.into(),
            content: "Body of the post".into(),
            excerpt: None,
            category_id: None,
            topic_cluster_id: None,
            featured_image_id: None,
            og_image_id: None,
            meta_description: Some("meta".into()),
            meta_keywords: None,
            canonical_url: None,
            og_title: None,
            og_description: None,
            twitter_card_type: None,
        }
    }

    #[test]
    fn insert_creates_draft_with_zero_counters() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let author = insert_user(&conn, "a@example.com");
        let repo = PostRepository::new(&conn);

        let post = repo.insert(author, &new_post("hello")).unwrap();
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.published_at.is_none());
        assert_eq!(post.view_count, 0);
        assert_eq!(post.meta_description.as_deref(), Some("meta"));
        assert_eq!(repo.find_by_slug("hello").unwrap().unwrap().id, post.id);
    }

    #[test]
    fn published_listing_orders_by_publication() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let author = insert_user(&conn, "a@example.com");
        let repo = PostRepository::new(&conn);

        let first = repo.insert(author, &new_post("first")).unwrap();
        let second = repo.insert(author, &new_post("second")).unwrap();
        repo.insert(author, &new_post("draft")).unwrap();
        repo.mark_published(first.id).unwrap();
        repo.mark_published(second.id).unwrap();

        let slugs: Vec<String> = repo
            .list_published(0, 10)
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["second", "first"]);
        assert_eq!(repo.list_published(1, 10).unwrap().len(), 1);
    }

    #[test]
    fn drafts_are_scoped_to_author() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let alice = insert_user(&conn, "alice@example.com");
        let bob = insert_user(&conn, "bob@example.com");
        insert_post(&conn, alice, "a1", "draft");
        insert_post(&conn, alice, "a2", "published");
        insert_post(&conn, bob, "b1", "draft");

        let repo = PostRepository::new(&conn);
        let drafts = repo.list_drafts(alice).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].slug, "a1");
    }

    #[test]
    fn counters_never_go_negative() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let author = insert_user(&conn, "a@example.com");
        let post = insert_post(&conn, author, "p", "published");
        let repo = PostRepository::new(&conn);

        assert_eq!(repo.adjust_counter(post, PostCounter::Likes, 1).unwrap(), 1);
        assert_eq!(repo.adjust_counter(post, PostCounter::Likes, -1).unwrap(), 0);
        assert_eq!(repo.adjust_counter(post, PostCounter::Likes, -1).unwrap(), 0);
        assert_eq!(repo.adjust_counter(post, PostCounter::Views, 1).unwrap(), 1);
    }

    #[test]
    fn delete_cascades_to_comments() {
        let (pool, _tmp) = setup();
        let conn = pool.get().unwrap();
        let author = insert_user(&conn, "a@example.com");
        let post = insert_post(&conn, author, "p", "published");
        conn.execute(
            "INSERT INTO comments (post_id, name, email, fingerprint_hash, content, created_at, updated_at)
             VALUES (?1, 'n', 'e@example.com', 'fp', 'hi', ?2, ?2)",
            params![post, Utc::now()],
        )
        .unwrap();

        let repo = PostRepository::new(&conn);
        assert!(repo.delete(post).unwrap());
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
