use serde::{Deserialize, Serialize};

use super::{check_email, check_length, check_optional_length};
use crate::services::ServiceError;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct UserRegister {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

impl UserRegister {
    pub fn validate(&self) -> Result<(), ServiceError> {
        check_optional_length("name", self.name.as_deref(), 1, 255)?;
        check_email(&self.email)?;
        check_length("password", &self.password, MIN_PASSWORD_LEN, 1024)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}
