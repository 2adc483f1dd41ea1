//! Request and response payloads, with the field rules each endpoint enforces.

pub mod category;
pub mod comment;
pub mod engagement;
pub mod media;
pub mod newsletter;
pub mod post;
pub mod tag;
pub mod topic_cluster;
pub mod user;

use serde::{Deserialize, Deserializer};

use crate::services::ServiceError;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `skip`/`limit` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Resolve to `(skip, limit)`, rejecting values outside `0..` and `1..=max_limit`.
    pub fn resolve(&self, default_limit: i64, max_limit: i64) -> Result<(i64, i64), ServiceError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(default_limit);
        if skip < 0 {
            return Err(ServiceError::Validation(
                "skip must be greater than or equal to 0".into(),
            ));
        }
        if !(1..=max_limit).contains(&limit) {
            return Err(ServiceError::Validation(format!(
                "limit must be between 1 and {max_limit}"
            )));
        }
        Ok((skip, limit))
    }
}

pub(crate) fn check_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ServiceError> {
    let len = value.chars().count();
    if len < min {
        return Err(ServiceError::Validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if len > max {
        return Err(ServiceError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn check_optional_length(
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Result<(), ServiceError> {
    match value {
        Some(v) => check_length(field, v, min, max),
        None => Ok(()),
    }
}

/// Loose structural check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

pub(crate) fn check_email(email: &str) -> Result<(), ServiceError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ServiceError::Validation(
            "value is not a valid email address".into(),
        ))
    }
}
