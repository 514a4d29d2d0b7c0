use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for category
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values written on insert/update. Timestamps are stamped by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
}

impl CategoryDraft {
    pub fn from_category(category: &Category) -> Self {
        Self {
            id: category.id,
            parent_id: category.parent_id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            display_order: category.display_order,
        }
    }
}

/// One edge of the category forest (`id` -> `parent_id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct ParentLink {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
}

impl From<&Category> for ParentLink {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            parent_id: category.parent_id,
        }
    }
}

/// Listing filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Only categories without a parent
    pub roots_only: bool,
    /// Only direct children of this category
    pub parent_id: Option<Uuid>,
}
