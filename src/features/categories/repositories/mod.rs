//! Persistence port for the category tree.
//!
//! Reads that need no invariant go through [`CategoryRepository`]. Every
//! read-validate-write sequence runs inside one [`CategoryUnitOfWork`]: an
//! exclusive, transactional view of the tree that is discarded unless
//! [`CategoryUnitOfWork::commit`] is called.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::features::categories::models::{Category, CategoryDraft, CategoryFilter, ParentLink};

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::InMemoryCategoryRepository;
pub use postgres::PgCategoryRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint '{constraint}' violated")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint '{constraint}' violated")]
    ForeignKeyViolation { constraint: String },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>>;

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;

    /// Categories matching `filter`, ordered by `display_order`, then `name`
    async fn list(&self, filter: CategoryFilter) -> StoreResult<Vec<Category>>;

    /// Open a unit of work. Concurrent units of work on the tree are serialized.
    async fn begin(&self) -> StoreResult<Box<dyn CategoryUnitOfWork>>;
}

#[async_trait]
pub trait CategoryUnitOfWork: Send {
    async fn find_by_id(&mut self, id: Uuid) -> StoreResult<Option<Category>>;

    async fn exists(&mut self, id: Uuid) -> StoreResult<bool>;

    /// The whole parent-pointer graph
    async fn parent_links(&mut self) -> StoreResult<Vec<ParentLink>>;

    async fn slugs(&mut self) -> StoreResult<HashSet<String>>;

    async fn insert(&mut self, draft: &CategoryDraft) -> StoreResult<Category>;

    /// Overwrite the mutable columns of `draft.id`. `None` if the row is gone.
    async fn update(&mut self, draft: &CategoryDraft) -> StoreResult<Option<Category>>;

    /// Returns true if the row existed
    async fn delete(&mut self, id: Uuid) -> StoreResult<bool>;

    async fn count_children(&mut self, id: Uuid) -> StoreResult<i64>;

    async fn count_tools_in_category(&mut self, category_id: Uuid) -> StoreResult<i64>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
