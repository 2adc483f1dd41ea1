use serde::Deserialize;

use super::check_length;
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct MediaCreate {
    pub url: String,
    pub media_type: String,
    pub cdn_url: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
}

impl MediaCreate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_length("url", &self.url, 1, 2048)?;
        check_length("media_type", &self.media_type, 1, 50)?;
        if self.size_bytes.is_some_and(|size| size < 0) {
            return Err(ServiceError::Validation(
                "size_bytes must not be negative".into(),
            ));
        }
        Ok(())
    }
}
