use rusqlite::Connection;

use super::{on_unique, ServiceError, ServiceResult};
use crate::db::models::{Category, CategoryTree};
use crate::repositories::CategoryRepository;
use crate::schemas::category::{CategoryCreate, CategoryUpdate};

pub struct CategoryService<'a> {
    repo: CategoryRepository<'a>,
}

impl<'a> CategoryService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            repo: CategoryRepository::new(conn),
        }
    }

    pub fn create(&self, input: &CategoryCreate) -> ServiceResult<Category> {
        input.validate()?;
        let conflict = || ServiceError::Conflict(format!("Slug '{}' already exists", input.slug));

        if self.repo.find_by_slug(&input.slug)?.is_some() {
            return Err(conflict());
        }
        if let Some(parent_id) = input.parent_id {
            self.require_parent(parent_id)?;
        }

        let category = on_unique(
            self.repo.insert(
                &input.name,
                &input.slug,
                input.description.as_deref(),
                input.parent_id,
            ),
            conflict,
        )?;
        tracing::info!(category_id = category.id, slug = %category.slug, "Created category");
        Ok(category)
    }

    pub fn get(&self, id: i64) -> ServiceResult<Category> {
        self.repo.find_by_id(id)?.ok_or_else(|| not_found(id))
    }

    pub fn get_with_children(&self, id: i64) -> ServiceResult<CategoryTree> {
        let category = self.get(id)?;
        let children = self.repo.children_of(id)?;
        Ok(CategoryTree { category, children })
    }

    pub fn list_top_level(&self, skip: i64, limit: i64) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.list_top_level(skip, limit)?)
    }

    pub fn list_top_level_with_children(&self) -> ServiceResult<Vec<CategoryTree>> {
        self.repo
            .list_top_level(0, i64::MAX)?
            .into_iter()
            .map(|category| {
                let children = self.repo.children_of(category.id)?;
                Ok(CategoryTree { category, children })
            })
            .collect()
    }

    pub fn update(&self, id: i64, input: &CategoryUpdate) -> ServiceResult<Category> {
        input.validate()?;
        let mut category = self.get(id)?;

        if let Some(slug) = &input.slug {
            if *slug != category.slug && self.repo.find_by_slug(slug)?.is_some() {
                return Err(duplicate_slug(slug));
            }
            category.slug = slug.clone();
        }
        if let Some(name) = &input.name {
            category.name = name.clone();
        }
        if let Some(description) = &input.description {
            category.description = description.clone();
        }
        if let Some(parent_id) = input.parent_id {
            if let Some(parent_id) = parent_id {
                self.require_parent(parent_id)?;
                self.reject_cycle(id, parent_id)?;
            }
            category.parent_id = parent_id;
        }

        let slug = category.slug.clone();
        let updated = on_unique(self.repo.update(&category), || duplicate_slug(&slug))?;
        tracing::info!(category_id = id, "Updated category");
        Ok(updated)
    }

    /// Returns the deleted category's name.
    pub fn delete(&self, id: i64) -> ServiceResult<String> {
        let category = self.get(id)?;
        let children = self.repo.count_children(id)?;
        if children > 0 {
            return Err(ServiceError::PreconditionFailed(format!(
                "Cannot delete category with {children} subcategories. \
                 Please move or delete child categories first."
            )));
        }

        self.repo.delete(id)?;
        tracing::info!(category_id = id, "Deleted category");
        Ok(category.name)
    }

    fn require_parent(&self, parent_id: i64) -> ServiceResult<()> {
        if self.repo.exists(parent_id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(format!(
                "Parent category with ID {parent_id} not found"
            )))
        }
    }

    /// Walk up from the proposed parent; reaching `id` means the move would create a cycle.
    fn reject_cycle(&self, id: i64, new_parent_id: i64) -> ServiceResult<()> {
        let mut cursor = Some(new_parent_id);
        while let Some(ancestor) = cursor {
            if ancestor == id {
                return Err(ServiceError::InvalidState(
                    "A category cannot be its own ancestor".into(),
                ));
            }
            cursor = self.repo.parent_id_of(ancestor)?;
        }
        Ok(())
    }
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("Category with ID {id} not found"))
}

fn duplicate_slug(slug: &str) -> ServiceError {
    ServiceError::Duplicate(format!("Slug '{slug}' already exists"))
}
