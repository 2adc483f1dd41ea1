use serde::Deserialize;

use super::check_email;
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct Subscribe {
    pub email: String,
    pub source_page: Option<String>,
}

impl Subscribe {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_email(&self.email)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Unsubscribe {
    pub email: String,
}
