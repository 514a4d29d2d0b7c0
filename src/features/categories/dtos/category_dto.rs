use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryFilter};
use crate::shared::types::deserialize_patch;
use crate::shared::validation::SLUG_REGEX;

/// Query params for listing categories
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,

    /// Only root categories (ignored when `tree` is true)
    #[serde(default)]
    pub roots_only: bool,

    /// Only direct children of this category (ignored when `tree` is true)
    pub parent_id: Option<Uuid>,
}

impl ListCategoriesQuery {
    pub fn filter(&self) -> CategoryFilter {
        CategoryFilter {
            roots_only: self.roots_only,
            parent_id: self.parent_id,
        }
    }
}

/// Create request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub description: Option<String>,

    /// Parent category; omit for a root category
    pub parent_id: Option<Uuid>,

    /// Explicit slug; derived from `name` when omitted
    #[validate(
        length(min = 1, max = 200),
        regex(
            path = *SLUG_REGEX,
            message = "slug must be lowercase kebab-case (e.g. 'text-to-video')"
        )
    )]
    pub slug: Option<String>,

    pub display_order: Option<i32>,
}

/// Update request. Omitted fields are left unchanged; `description` and
/// `parent_id` accept `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    /// New parent; `null` moves the category to the root level
    #[serde(default, deserialize_with = "deserialize_patch")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,

    #[validate(
        length(min = 1, max = 200),
        regex(
            path = *SLUG_REGEX,
            message = "slug must be lowercase kebab-case (e.g. 'text-to-video')"
        )
    )]
    pub slug: Option<String>,

    pub display_order: Option<i32>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            display_order: c.display_order,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build tree from a flat, already ordered list of categories.
    ///
    /// Sibling order follows the input order. Rows caught in a parent cycle
    /// have no root to hang from and are left out.
    pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryTreeDto> {
        let mut children: HashMap<Uuid, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();

        for (index, category) in categories.iter().enumerate() {
            match category.parent_id {
                Some(parent_id) => children.entry(parent_id).or_default().push(index),
                None => roots.push(index),
            }
        }

        roots
            .into_iter()
            .map(|index| Self::build_node(index, &categories, &children))
            .collect()
    }

    fn build_node(
        index: usize,
        categories: &[Category],
        children: &HashMap<Uuid, Vec<usize>>,
    ) -> CategoryTreeDto {
        let category = &categories[index];
        let nodes = children
            .get(&category.id)
            .into_iter()
            .flatten()
            .map(|&child| Self::build_node(child, categories, children))
            .collect();

        CategoryTreeDto {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            display_order: category.display_order,
            children: nodes,
        }
    }
}

/// Descendants of a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDescendantsDto {
    pub id: Uuid,
    /// Sorted for stable output
    pub descendant_ids: Vec<Uuid>,
}
