use rusqlite::Connection;

use super::{on_unique, ServiceError, ServiceResult};
use crate::db::models::Tag;
use crate::repositories::TagRepository;
use crate::schemas::tag::TagCreate;

pub struct TagService<'a> {
    repo: TagRepository<'a>,
}

impl<'a> TagService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            repo: TagRepository::new(conn),
        }
    }

    pub fn create(&self, input: &TagCreate) -> ServiceResult<Tag> {
        input.validate()?;
        let conflict = || ServiceError::Conflict(format!("Tag slug '{}' already exists", input.slug));
        if self.repo.find_by_slug(&input.slug)?.is_some() {
            return Err(conflict());
        }
        let tag = on_unique(self.repo.insert(&input.name, &input.slug), conflict)?;
        tracing::info!(tag_id = tag.id, slug = %tag.slug, "Created tag");
        Ok(tag)
    }

    pub fn list(&self) -> ServiceResult<Vec<Tag>> {
        Ok(self.repo.list()?)
    }

    pub fn get_by_slug(&self, slug: &str) -> ServiceResult<Tag> {
        self.repo
            .find_by_slug(slug)?
            .ok_or_else(|| ServiceError::NotFound("Tag not found".into()))
    }

    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id)? {
            return Err(ServiceError::NotFound("Tag not found".into()));
        }
        tracing::info!(tag_id = id, "Deleted tag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::TestDb;

    #[test]
    fn tag_lifecycle() {
        let db = TestDb::new();
        let conn = db.conn();
        let service = TagService::new(&conn);
        let input = TagCreate {
            name: "Rust".into(),
            slug: "rust".into(),
        };

        let tag = service.create(&input).unwrap();
        assert!(matches!(service.create(&input), Err(ServiceError::Conflict(_))));
        assert_eq!(service.get_by_slug("rust").unwrap(), tag);
        assert_eq!(service.list().unwrap().len(), 1);

        service.delete(tag.id).unwrap();
        assert!(matches!(service.delete(tag.id), Err(ServiceError::NotFound(_))));
        assert!(matches!(service.get_by_slug("rust"), Err(ServiceError::NotFound(_))));
    }
}
