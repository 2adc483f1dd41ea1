use rusqlite::Connection;

use super::{on_unique, ServiceError, ServiceResult};
use crate::db::models::NewsletterSubscriber;
use crate::repositories::NewsletterRepository;
use crate::schemas::newsletter::Subscribe;

const DEFAULT_SOURCE_PAGE: &str = "unknown";

pub struct NewsletterService<'a> {
    repo: NewsletterRepository<'a>,
}

impl<'a> NewsletterService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            repo: NewsletterRepository::new(conn),
        }
    }

    pub fn subscribe(&self, input: &Subscribe) -> ServiceResult<NewsletterSubscriber> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();
        let conflict = || ServiceError::Conflict("Email is already subscribed".into());

        if self.repo.find_by_email(&email)?.is_some() {
            return Err(conflict());
        }
        let source = input.source_page.as_deref().unwrap_or(DEFAULT_SOURCE_PAGE);
        let subscriber = on_unique(self.repo.insert(&email, source), conflict)?;
        tracing::info!(subscriber_id = subscriber.id, "New newsletter subscriber");
        Ok(subscriber)
    }

    /// Succeeds whether or not the address was subscribed.
    pub fn unsubscribe(&self, email: &str) -> ServiceResult<()> {
        let email = email.trim().to_lowercase();
        if self.repo.delete_by_email(&email)? {
            tracing::info!("Newsletter subscriber removed");
        }
        Ok(())
    }
}
