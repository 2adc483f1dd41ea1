use serde::Deserialize;

use super::{check_length, check_optional_length, nullable};
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

impl CategoryCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_length("name", &self.name, 1, 255)?;
        check_length("slug", &self.slug, 1, 255)?;
        check_optional_length("description", self.description.as_deref(), 0, 500)
    }
}

/// Partial update. `parent_id: null` moves the category to the top level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub parent_id: Option<Option<i64>>,
}

impl CategoryUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_optional_length("name", self.name.as_deref(), 1, 255)?;
        check_optional_length("slug", self.slug.as_deref(), 1, 255)?;
        check_optional_length(
            "description",
            self.description.as_ref().and_then(|d| d.as_deref()),
            0,
            500,
        )
    }
}
