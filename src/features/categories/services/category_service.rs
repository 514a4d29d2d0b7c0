use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::CategoryConfig;
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::errors::{CategoryError, CategoryResult};
use crate::features::categories::models::{Category, CategoryDraft, CategoryFilter};
use crate::features::categories::repositories::{CategoryRepository, CategoryUnitOfWork};
use crate::features::categories::tree::CategoryForest;
use crate::shared::constants::{SLUG_CONFLICT_RETRIES, SLUG_MAX_LENGTH};
use crate::shared::slug;

const DESCRIPTION_MAX_LENGTH: usize = 2000;

/// Validated create input
struct NewCategory {
    name: String,
    description: Option<String>,
    parent_id: Option<Uuid>,
    slug: Option<String>,
    display_order: i32,
}

/// Validated update input; `None` leaves a field unchanged
struct CategoryPatch {
    name: Option<String>,
    description: Option<Option<String>>,
    parent_id: Option<Option<Uuid>>,
    slug: Option<String>,
    display_order: Option<i32>,
}

/// Trim a description, treating blank text as absent
fn validate_description(description: Option<String>) -> CategoryResult<Option<String>> {
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    if let Some(ref d) = description {
        if d.chars().count() > DESCRIPTION_MAX_LENGTH {
            return Err(CategoryError::Validation(format!(
                "description must be at most {} characters",
                DESCRIPTION_MAX_LENGTH
            )));
        }
    }

    Ok(description)
}

fn validate_slug_override(requested: String) -> CategoryResult<String> {
    let requested = requested.trim().to_string();
    if requested.len() > SLUG_MAX_LENGTH {
        return Err(CategoryError::Validation(format!(
            "slug must be at most {} characters",
            SLUG_MAX_LENGTH
        )));
    }
    if !slug::is_valid_slug(&requested) {
        return Err(CategoryError::Validation(format!(
            "slug '{}' must be lowercase kebab-case (e.g. 'text-to-video')",
            requested
        )));
    }
    Ok(requested)
}

/// Category tree manager: CRUD over categories with slug and forest invariants
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
    config: CategoryConfig,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>, config: CategoryConfig) -> Self {
        Self { repository, config }
    }

    /// List categories (flat list)
    pub async fn list(&self, filter: CategoryFilter) -> CategoryResult<Vec<CategoryResponseDto>> {
        let categories = self.repository.list(filter).await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// List all categories as tree structure
    pub async fn list_tree(&self) -> CategoryResult<Vec<CategoryTreeDto>> {
        let categories = self.repository.list(CategoryFilter::default()).await?;
        Ok(CategoryTreeDto::build_tree(categories))
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> CategoryResult<CategoryResponseDto> {
        self.repository
            .find_by_slug(slug)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| CategoryError::NotFound(slug.to_string()))
    }

    /// Get category by id
    pub async fn get_by_id(&self, id: Uuid) -> CategoryResult<CategoryResponseDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))
    }

    /// Create a category, deriving its slug from the name unless one is given
    pub async fn create(&self, dto: CreateCategoryDto) -> CategoryResult<CategoryResponseDto> {
        let input = NewCategory {
            name: self.validate_name(&dto.name)?,
            description: validate_description(dto.description)?,
            parent_id: dto.parent_id,
            slug: dto.slug.map(validate_slug_override).transpose()?,
            display_order: dto.display_order.unwrap_or(0),
        };

        let mut retries = 0;
        let category = loop {
            match self.try_create(&input).await {
                Err(CategoryError::SlugConflict) if retries < SLUG_CONFLICT_RETRIES => {
                    retries += 1;
                    tracing::warn!(
                        name = %input.name,
                        "Category slug taken by a concurrent write, retrying create"
                    );
                }
                Err(CategoryError::SlugConflict) => {
                    return Err(CategoryError::Conflict(format!(
                        "Could not reserve a slug for '{}' because of concurrent writes, please retry",
                        input.name
                    )));
                }
                result => break result?,
            }
        };

        tracing::info!(
            category_id = %category.id,
            slug = %category.slug,
            parent_id = ?category.parent_id,
            "Category created"
        );

        Ok(category.into())
    }

    async fn try_create(&self, input: &NewCategory) -> CategoryResult<Category> {
        let mut uow = self.repository.begin().await?;

        if let Some(parent_id) = input.parent_id {
            if !uow.exists(parent_id).await? {
                return Err(CategoryError::ParentNotFound(parent_id));
            }
        }

        let taken = uow.slugs().await?;
        let slug = match &input.slug {
            Some(requested) if taken.contains(requested) => {
                return Err(CategoryError::SlugTaken(requested.clone()));
            }
            Some(requested) => requested.clone(),
            None => slug::generate(&input.name, &taken)?,
        };

        let draft = CategoryDraft {
            id: Uuid::now_v7(),
            parent_id: input.parent_id,
            name: input.name.clone(),
            slug,
            description: input.description.clone(),
            display_order: input.display_order,
        };

        let category = uow.insert(&draft).await?;
        uow.commit().await?;

        Ok(category)
    }

    /// Update a category.
    ///
    /// A changed name re-derives the slug (ignoring the category's own current
    /// slug); a changed parent is checked for existence and cycles against the
    /// forest as it would look after the edit.
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateCategoryDto,
    ) -> CategoryResult<CategoryResponseDto> {
        let patch = CategoryPatch {
            name: dto.name.map(|n| self.validate_name(&n)).transpose()?,
            description: dto.description.map(validate_description).transpose()?,
            parent_id: dto.parent_id,
            slug: dto.slug.map(validate_slug_override).transpose()?,
            display_order: dto.display_order,
        };

        let mut retries = 0;
        let category = loop {
            match self.try_update(id, &patch).await {
                Err(CategoryError::SlugConflict) if retries < SLUG_CONFLICT_RETRIES => {
                    retries += 1;
                    tracing::warn!(
                        category_id = %id,
                        "Category slug taken by a concurrent write, retrying update"
                    );
                }
                Err(CategoryError::SlugConflict) => {
                    return Err(CategoryError::Conflict(format!(
                        "Could not update category {} because of concurrent writes, please retry",
                        id
                    )));
                }
                result => break result?,
            }
        };

        Ok(category.into())
    }

    async fn try_update(&self, id: Uuid, patch: &CategoryPatch) -> CategoryResult<Category> {
        let mut uow = self.repository.begin().await?;

        let current = uow
            .find_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))?;

        let mut draft = CategoryDraft::from_category(&current);
        if let Some(name) = &patch.name {
            draft.name = name.clone();
        }
        if let Some(description) = &patch.description {
            draft.description = description.clone();
        }
        if let Some(parent_id) = patch.parent_id {
            draft.parent_id = parent_id;
        }
        if let Some(display_order) = patch.display_order {
            draft.display_order = display_order;
        }

        if let Some(parent_id) = draft.parent_id {
            let forest = CategoryForest::from_links(uow.parent_links().await?);
            if !forest.contains(parent_id) {
                return Err(CategoryError::ParentNotFound(parent_id));
            }
            if forest.would_create_cycle(id, parent_id) {
                return Err(CategoryError::CycleDetected { id, parent_id });
            }
        }

        draft.slug = self
            .resolve_updated_slug(uow.as_mut(), &current, &draft.name, patch.slug.as_ref())
            .await?;

        if draft == CategoryDraft::from_category(&current) {
            tracing::debug!(category_id = %id, "Category update is a no-op");
            return Ok(current);
        }

        let category = uow
            .update(&draft)
            .await?
            .ok_or_else(|| CategoryError::NotFound(id.to_string()))?;
        uow.commit().await?;

        tracing::info!(
            category_id = %category.id,
            slug = %category.slug,
            parent_id = ?category.parent_id,
            "Category updated"
        );

        Ok(category)
    }

    async fn resolve_updated_slug(
        &self,
        uow: &mut dyn CategoryUnitOfWork,
        current: &Category,
        name: &str,
        requested: Option<&String>,
    ) -> CategoryResult<String> {
        match requested {
            Some(requested) if *requested == current.slug => Ok(requested.clone()),
            Some(requested) => {
                if uow.slugs().await?.contains(requested) {
                    return Err(CategoryError::SlugTaken(requested.clone()));
                }
                Ok(requested.clone())
            }
            None if name != current.name => {
                let mut taken = uow.slugs().await?;
                taken.remove(&current.slug);
                Ok(slug::generate(name, &taken)?)
            }
            None => Ok(current.slug.clone()),
        }
    }

    /// Delete a leaf category that no tool references
    pub async fn delete(&self, id: Uuid) -> CategoryResult<()> {
        let mut uow = self.repository.begin().await?;

        if !uow.exists(id).await? {
            return Err(CategoryError::NotFound(id.to_string()));
        }

        let children = uow.count_children(id).await?;
        if children > 0 {
            return Err(CategoryError::HasChildren {
                id,
                count: children,
            });
        }

        let tools = uow.count_tools_in_category(id).await?;
        if tools > 0 {
            return Err(CategoryError::HasDependentTools { id, count: tools });
        }

        if !uow.delete(id).await? {
            return Err(CategoryError::NotFound(id.to_string()));
        }
        uow.commit().await?;

        tracing::info!(category_id = %id, "Category deleted");

        Ok(())
    }

    /// Ids of every category below `id` in the tree (excluding `id` itself)
    pub async fn list_descendant_ids(&self, id: Uuid) -> CategoryResult<HashSet<Uuid>> {
        let mut uow = self.repository.begin().await?;
        let links = uow.parent_links().await?;
        uow.commit().await?;

        let forest = CategoryForest::from_links(links);
        if !forest.contains(id) {
            return Err(CategoryError::NotFound(id.to_string()));
        }
        if forest.has_cycle() {
            tracing::warn!(category_id = %id, "Category tree contains a parent cycle");
        }

        Ok(forest.descendant_ids(id))
    }

    fn validate_name(&self, name: &str) -> CategoryResult<String> {
        let name = name.trim();
        let length = name.chars().count();

        if length < self.config.name_min_length {
            return Err(CategoryError::Validation(format!(
                "name must be at least {} characters",
                self.config.name_min_length
            )));
        }
        if length > self.config.name_max_length {
            return Err(CategoryError::Validation(format!(
                "name must be at most {} characters",
                self.config.name_max_length
            )));
        }

        Ok(name.to_string())
    }
}
