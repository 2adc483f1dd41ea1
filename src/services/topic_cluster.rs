use rusqlite::Connection;

use super::{on_unique, ServiceError, ServiceResult};
use crate::db::models::TopicCluster;
use crate::repositories::{PostRepository, TopicClusterRepository};
use crate::schemas::topic_cluster::{TopicClusterCreate, TopicClusterUpdate};

pub struct TopicClusterService<'a> {
    conn: &'a Connection,
    repo: TopicClusterRepository<'a>,
}

impl<'a> TopicClusterService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            repo: TopicClusterRepository::new(conn),
        }
    }

    pub fn create(&self, input: &TopicClusterCreate) -> ServiceResult<TopicCluster> {
        input.validate()?;
        if self.repo.find_by_slug(&input.slug)?.is_some() {
            return Err(duplicate_slug(&input.slug));
        }
        if let Some(post_id) = input.pillar_post_id {
            self.require_post(post_id)?;
        }

        let cluster = on_unique(
            self.repo
                .insert(&input.name, &input.slug, input.pillar_post_id),
            || duplicate_slug(&input.slug),
        )?;
        tracing::info!(cluster_id = cluster.id, slug = %cluster.slug, "Created topic cluster");
        Ok(cluster)
    }

    pub fn get(&self, id: i64) -> ServiceResult<TopicCluster> {
        self.repo.find_by_id(id)?.ok_or_else(|| {
            ServiceError::NotFound(format!("Topic cluster with ID {id} not found"))
        })
    }

    pub fn get_by_slug(&self, slug: &str) -> ServiceResult<TopicCluster> {
        self.repo.find_by_slug(slug)?.ok_or_else(|| {
            ServiceError::NotFound(format!("Topic cluster with slug '{slug}' not found"))
        })
    }

    pub fn list(&self, skip: i64, limit: i64) -> ServiceResult<Vec<TopicCluster>> {
        Ok(self.repo.list(skip, limit)?)
    }

    pub fn update(&self, id: i64, input: &TopicClusterUpdate) -> ServiceResult<TopicCluster> {
        input.validate()?;
        let mut cluster = self.get(id)?;

        if let Some(slug) = &input.slug {
            if *slug != cluster.slug && self.repo.find_by_slug(slug)?.is_some() {
                return Err(duplicate_slug(slug));
            }
            cluster.slug = slug.clone();
        }
        if let Some(name) = &input.name {
            cluster.name = name.clone();
        }
        if let Some(pillar) = input.pillar_post_id {
            if let Some(post_id) = pillar {
                self.require_post(post_id)?;
            }
            cluster.pillar_post_id = pillar;
        }

        let slug = cluster.slug.clone();
        let updated = on_unique(self.repo.update(&cluster), || duplicate_slug(&slug))?;
        tracing::info!(cluster_id = id, "Updated topic cluster");
        Ok(updated)
    }

    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        self.get(id)?;
        self.repo.delete(id)?;
        tracing::info!(cluster_id = id, "Deleted topic cluster");
        Ok(())
    }

    fn require_post(&self, post_id: i64) -> ServiceResult<()> {
        if PostRepository::new(self.conn).exists(post_id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(format!(
                "Pillar post with ID {post_id} not found"
            )))
        }
    }
}

fn duplicate_slug(slug: &str) -> ServiceError {
    ServiceError::Duplicate(format!("Slug '{slug}' already exists"))
}
