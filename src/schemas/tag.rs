use serde::Deserialize;

use super::check_length;
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct TagCreate {
    pub name: String,
    pub slug: String,
}

impl TagCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_length("name", &self.name, 1, 100)?;
        check_length("slug", &self.slug, 1, 100)
    }
}
