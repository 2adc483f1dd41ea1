use rusqlite::Connection;

use super::{ServiceError, ServiceResult};
use crate::db::models::Media;
use crate::repositories::MediaRepository;
use crate::schemas::media::MediaCreate;

pub struct MediaService<'a> {
    repo: MediaRepository<'a>,
}

impl<'a> MediaService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            repo: MediaRepository::new(conn),
        }
    }

    pub fn create(&self, input: &MediaCreate) -> ServiceResult<Media> {
        input.validate()?;
        let media = self.repo.insert(input)?;
        tracing::info!(media_id = media.id, "Registered media");
        Ok(media)
    }

    pub fn get(&self, id: i64) -> ServiceResult<Media> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::NotFound("Media not found".into()))
    }

    pub fn list(&self, skip: i64, limit: i64) -> ServiceResult<Vec<Media>> {
        Ok(self.repo.list(skip, limit)?)
    }

    /// Posts using this media as an image keep existing with the reference cleared.
    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id)? {
            return Err(ServiceError::NotFound("Media not found".into()));
        }
        tracing::info!(media_id = id, "Deleted media");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::TestDb;

    #[test]
    fn media_lifecycle() {
        let db = TestDb::new();
        let conn = db.conn();
        let service = MediaService::new(&conn);

        let media = service
            .create(&MediaCreate {
                url: "https://cdn.example.com/a.png".into(),
                media_type: "image".into(),
                cdn_url: None,
                alt_text: None,
                caption: None,
                mime_type: Some("image/png".into()),
                size_bytes: Some(1024),
            })
            .unwrap();
        assert_eq!(service.get(media.id).unwrap().mime_type, "image/png");

        service.delete(media.id).unwrap();
        assert!(matches!(service.get(media.id), Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete(media.id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn negative_size_is_rejected() {
        let db = TestDb::new();
        let conn = db.conn();
        let service = MediaService::new(&conn);
        let err = service
            .create(&MediaCreate {
                url: "u".into(),
                media_type: "image".into(),
                cdn_url: None,
                alt_text: None,
                caption: None,
                mime_type: None,
                size_bytes: Some(-1),
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
