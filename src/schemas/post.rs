use serde::Deserialize;

use super::{check_length, check_optional_length};
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct PostCreate {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: Option<i64>,
    pub topic_cluster_id: Option<i64>,
    pub featured_image_id: Option<i64>,
    pub og_image_id: Option<i64>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub canonical_url: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub twitter_card_type: Option<String>,
}

impl PostCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_length("title", &self.title, 1, 500)?;
        check_length("slug", &self.slug, 1, 500)?;
        check_length("content", &self.content, 10, usize::MAX)?;
        check_optional_length("excerpt", self.excerpt.as_deref(), 0, 1000)?;
        check_optional_length("meta_description", self.meta_description.as_deref(), 0, 500)
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category_id: Option<i64>,
    pub topic_cluster_id: Option<i64>,
    pub featured_image_id: Option<i64>,
    pub og_image_id: Option<i64>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub canonical_url: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub twitter_card_type: Option<String>,
}

impl PostUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_optional_length("title", self.title.as_deref(), 1, 500)?;
        check_optional_length("slug", self.slug.as_deref(), 1, 500)?;
        check_optional_length("content", self.content.as_deref(), 10, usize::MAX)?;
        check_optional_length("excerpt", self.excerpt.as_deref(), 0, 1000)?;
        check_optional_length("meta_description", self.meta_description.as_deref(), 0, 500)
    }
}
