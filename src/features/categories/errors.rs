use thiserror::Error;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::categories::repositories::StoreError;
use crate::shared::constants::CATEGORY_SLUG_CONSTRAINT;
use crate::shared::slug::SlugError;

/// Failures of the category tree manager
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("{0}")]
    Validation(String),

    #[error("Cannot build a slug from '{0}'; the name needs at least one letter or digit")]
    InvalidSlugInput(String),

    #[error("Parent category {0} does not exist")]
    ParentNotFound(Uuid),

    #[error("Category '{0}' not found")]
    NotFound(String),

    #[error("Category {id} cannot be placed under {parent_id}: it would become its own ancestor")]
    CycleDetected { id: Uuid, parent_id: Uuid },

    #[error("This category has {count} sub-categories; move or delete them first")]
    HasChildren { id: Uuid, count: i64 },

    #[error("This category is used by {count} tools; reassign them first")]
    HasDependentTools { id: Uuid, count: i64 },

    #[error("Slug '{0}' is already used by another category")]
    SlugTaken(String),

    /// Lost a slug race at write time. Retried internally, never surfaced.
    #[error("Slug was taken by a concurrent write")]
    SlugConflict,

    #[error("{0}")]
    Conflict(String),

    #[error("Category storage unavailable: {0}")]
    StorageUnavailable(#[source] StoreError),
}

pub type CategoryResult<T> = std::result::Result<T, CategoryError>;

impl From<SlugError> for CategoryError {
    fn from(e: SlugError) -> Self {
        match e {
            SlugError::InvalidInput(name) => CategoryError::InvalidSlugInput(name),
        }
    }
}

impl From<StoreError> for CategoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation { ref constraint }
                if constraint == CATEGORY_SLUG_CONSTRAINT =>
            {
                CategoryError::SlugConflict
            }
            StoreError::UniqueViolation { constraint } => CategoryError::Conflict(format!(
                "Concurrent update violated constraint '{}', please retry",
                constraint
            )),
            StoreError::ForeignKeyViolation { constraint } => CategoryError::Conflict(format!(
                "Referenced data changed concurrently ({}), please retry",
                constraint
            )),
            other => {
                tracing::error!("Category storage failure: {:?}", other);
                CategoryError::StorageUnavailable(other)
            }
        }
    }
}

impl From<CategoryError> for AppError {
    fn from(e: CategoryError) -> Self {
        let message = e.to_string();
        match e {
            CategoryError::Validation(_) | CategoryError::InvalidSlugInput(_) => {
                AppError::Validation(message)
            }
            CategoryError::ParentNotFound(_) => AppError::UnprocessableEntity(message),
            CategoryError::NotFound(_) => AppError::NotFound(message),
            CategoryError::CycleDetected { .. }
            | CategoryError::HasChildren { .. }
            | CategoryError::HasDependentTools { .. }
            | CategoryError::SlugTaken(_)
            | CategoryError::SlugConflict
            | CategoryError::Conflict(_) => AppError::Conflict(message),
            CategoryError::StorageUnavailable(_) => AppError::ServiceUnavailable(message),
        }
    }
}
