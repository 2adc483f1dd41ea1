use rusqlite::Connection;

use super::{on_unique, ServiceError, ServiceResult};
use crate::db::models::{BlogPost, PostStatus, Tag};
use crate::repositories::{
    CategoryRepository, MediaRepository, PostRepository, RedirectRepository, TagRepository,
    TopicClusterRepository,
};
use crate::schemas::post::{PostCreate, PostUpdate};

/// Outcome of a public slug lookup.
#[derive(Debug)]
pub enum SlugLookup {
    Found(BlogPost),
    /// The slug was retired; the post now lives at this slug.
    Moved(String),
}

pub struct PostService<'a> {
    conn: &'a Connection,
    repo: PostRepository<'a>,
}

impl<'a> PostService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            repo: PostRepository::new(conn),
        }
    }

    /// New posts always start as drafts.
    pub fn create(&self, author_id: i64, input: &PostCreate) -> ServiceResult<BlogPost> {
        input.validate()?;
        let conflict = || ServiceError::Conflict("Post slug already exists".into());

        if self.repo.find_by_slug(&input.slug)?.is_some() {
            return Err(conflict());
        }
        self.require_references(
            input.category_id,
            input.topic_cluster_id,
            [input.featured_image_id, input.og_image_id],
        )?;

        let post = on_unique(self.repo.insert(author_id, input), conflict)?;
        tracing::info!(post_id = post.id, author_id, slug = %post.slug, "Created draft post");
        Ok(post)
    }

    pub fn get(&self, id: i64) -> ServiceResult<BlogPost> {
        self.repo.find_by_id(id)?.ok_or_else(post_not_found)
    }

    /// Published posts only. A retired slug resolves to its replacement.
    pub fn get_by_slug(&self, slug: &str) -> ServiceResult<SlugLookup> {
        match self.repo.find_by_slug(slug)? {
            Some(post) if post.status == PostStatus::Published => Ok(SlugLookup::Found(post)),
            Some(_) => Err(post_not_found()),
            None => match RedirectRepository::new(self.conn).find_by_old_slug(slug)? {
                Some(redirect) => Ok(SlugLookup::Moved(redirect.new_slug)),
                None => Err(post_not_found()),
            },
        }
    }

    pub fn list_published(&self, skip: i64, limit: i64) -> ServiceResult<Vec<BlogPost>> {
        Ok(self.repo.list_published(skip, limit)?)
    }

    pub fn list_drafts(&self, author_id: i64) -> ServiceResult<Vec<BlogPost>> {
        Ok(self.repo.list_drafts(author_id)?)
    }

    pub fn update(&self, id: i64, author_id: i64, input: &PostUpdate) -> ServiceResult<BlogPost> {
        let mut post = self.owned_post(id, author_id, "Not authorized to update this post")?;
        input.validate()?;
        let conflict = || ServiceError::Conflict("Slug already exists".into());

        let old_slug = post.slug.clone();
        if let Some(slug) = &input.slug {
            if *slug != old_slug && self.repo.find_by_slug(slug)?.is_some() {
                return Err(conflict());
            }
        }
        self.require_references(
            input.category_id,
            input.topic_cluster_id,
            [input.featured_image_id, input.og_image_id],
        )?;

        apply_update(&mut post, input);
        let slug_changed = post.slug != old_slug;

        let tx = self.conn.unchecked_transaction()?;
        let updated = on_unique(PostRepository::new(&tx).update(&post), conflict)?;
        if slug_changed {
            let redirects = RedirectRepository::new(&tx);
            if updated.status == PostStatus::Published {
                redirects.retarget(&old_slug, &updated.slug)?;
                redirects.upsert(&old_slug, &updated.slug)?;
            }
            redirects.delete_by_old_slug(&updated.slug)?;
        }
        tx.commit()?;

        tracing::info!(post_id = id, slug_changed, "Updated post");
        Ok(updated)
    }

    pub fn publish(&self, id: i64, author_id: i64) -> ServiceResult<BlogPost> {
        let post = self.owned_post(id, author_id, "Not authorized")?;
        if post.status != PostStatus::Draft {
            return Err(ServiceError::InvalidState(
                "Only draft posts can be published".into(),
            ));
        }

        let published = self.repo.mark_published(id)?;
        tracing::info!(post_id = id, "Published post");
        Ok(published)
    }

    /// Hard delete; comments, likes, views and tag links go with the post,
    /// as do redirects that resolved to it.
    pub fn delete(&self, id: i64, author_id: i64) -> ServiceResult<()> {
        let post = self.owned_post(id, author_id, "Not authorized")?;

        let tx = self.conn.unchecked_transaction()?;
        RedirectRepository::new(&tx).delete_by_new_slug(&post.slug)?;
        PostRepository::new(&tx).delete(id)?;
        tx.commit()?;
        tracing::info!(post_id = id, "Deleted post");
        Ok(())
    }

    pub fn tags(&self, id: i64) -> ServiceResult<Vec<Tag>> {
        self.get(id)?;
        Ok(TagRepository::new(self.conn).tags_for_post(id)?)
    }

    pub fn attach_tag(&self, id: i64, author_id: i64, tag_id: i64) -> ServiceResult<Vec<Tag>> {
        self.owned_post(id, author_id, "Not authorized")?;
        let tags = TagRepository::new(self.conn);
        if tags.find_by_id(tag_id)?.is_none() {
            return Err(ServiceError::NotFound("Tag not found".into()));
        }
        tags.attach(id, tag_id)?;
        Ok(tags.tags_for_post(id)?)
    }

    pub fn detach_tag(&self, id: i64, author_id: i64, tag_id: i64) -> ServiceResult<()> {
        self.owned_post(id, author_id, "Not authorized")?;
        TagRepository::new(self.conn).detach(id, tag_id)?;
        Ok(())
    }

    fn owned_post(&self, id: i64, author_id: i64, forbidden: &str) -> ServiceResult<BlogPost> {
        let post = self.get(id)?;
        if post.author_id != author_id {
            return Err(ServiceError::Forbidden(forbidden.to_string()));
        }
        Ok(post)
    }

    fn require_references(
        &self,
        category_id: Option<i64>,
        topic_cluster_id: Option<i64>,
        media_ids: [Option<i64>; 2],
    ) -> ServiceResult<()> {
        if let Some(id) = category_id {
            if !CategoryRepository::new(self.conn).exists(id)? {
                return Err(ServiceError::NotFound(format!(
                    "Category with ID {id} not found"
                )));
            }
        }
        if let Some(id) = topic_cluster_id {
            if !TopicClusterRepository::new(self.conn).exists(id)? {
                return Err(ServiceError::NotFound(format!(
                    "Topic cluster with ID {id} not found"
                )));
            }
        }
        let media = MediaRepository::new(self.conn);
        for id in media_ids.into_iter().flatten() {
            if !media.exists(id)? {
                return Err(ServiceError::NotFound(format!("Media with ID {id} not found")));
            }
        }
        Ok(())
    }
}

fn post_not_found() -> ServiceError {
    ServiceError::NotFound("Post not found".into())
}

fn apply_update(post: &mut BlogPost, input: &PostUpdate) {
    fn set<T: Clone>(field: &mut T, value: &Option<T>) {
        if let Some(value) = value {
            *field = value.clone();
        }
    }
    fn set_opt<T: Clone>(field: &mut Option<T>, value: &Option<T>) {
        if value.is_some() {
            field.clone_from(value);
        }
    }

    set(&mut post.title, &input.title);
    set(&mut post.slug, &input.slug);
    set(&mut post.content, &input.content);
    set_opt(&mut post.excerpt, &input.excerpt);
    set_opt(&mut post.category_id, &input.category_id);
    set_opt(&mut post.topic_cluster_id, &input.topic_cluster_id);
    set_opt(&mut post.featured_image_id, &input.featured_image_id);
    set_opt(&mut post.og_image_id, &input.og_image_id);
    set_opt(&mut post.meta_description, &input.meta_description);
    set_opt(&mut post.meta_keywords, &input.meta_keywords);
    set_opt(&mut post.canonical_url, &input.canonical_url);
    set_opt(&mut post.og_title, &input.og_title);
    set_opt(&mut post.og_description, &input.og_description);
    set_opt(&mut post.twitter_card_type, &input.twitter_card_type);
}
