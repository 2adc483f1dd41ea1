use serde::Deserialize;

use super::{check_length, check_optional_length, nullable};
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct TopicClusterCreate {
    pub name: String,
    pub slug: String,
    pub pillar_post_id: Option<i64>,
}

impl TopicClusterCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_length("name", &self.name, 1, 255)?;
        check_length("slug", &self.slug, 1, 255)
    }
}

/// Partial update. `pillar_post_id: null` clears the pillar post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicClusterUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub pillar_post_id: Option<Option<i64>>,
}

impl TopicClusterUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_optional_length("name", self.name.as_deref(), 1, 255)?;
        check_optional_length("slug", self.slug.as_deref(), 1, 255)
    }
}
