use serde::Deserialize;

use super::{check_email, check_length};
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct CommentCreate {
    pub name: String,
    pub email: String,
    pub content: String,
    pub parent_id: Option<i64>,
}

impl CommentCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_length("name", &self.name, 1, 255)?;
        check_email(&self.email)?;
        check_length("content", &self.content, 1, 5000)
    }
}
