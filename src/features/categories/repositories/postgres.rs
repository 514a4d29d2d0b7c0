use std::borrow::Cow;
use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::features::categories::models::{Category, CategoryDraft, CategoryFilter, ParentLink};
use crate::features::categories::repositories::{
    CategoryRepository, CategoryUnitOfWork, StoreError, StoreResult,
};
use crate::shared::constants::CATEGORY_TREE_LOCK_KEY;

/// Translate driver errors, keeping constraint violations distinguishable
fn store_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        let constraint = db_err.constraint().unwrap_or_default().to_string();

        // PostgreSQL unique_violation
        if db_err.code() == Some(Cow::Borrowed("23505")) {
            return StoreError::UniqueViolation { constraint };
        }

        // PostgreSQL foreign_key_violation
        if db_err.code() == Some(Cow::Borrowed("23503")) {
            return StoreError::ForeignKeyViolation { constraint };
        }
    }

    StoreError::Database(e)
}

/// PostgreSQL-backed category store
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, display_order, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, display_order, created_at, updated_at
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn list(&self, filter: CategoryFilter) -> StoreResult<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, display_order, created_at, updated_at
            FROM categories
            WHERE ($1 = FALSE OR parent_id IS NULL)
              AND ($2::uuid IS NULL OR parent_id = $2)
            ORDER BY display_order, name
            "#,
        )
        .bind(filter.roots_only)
        .bind(filter.parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn begin(&self) -> StoreResult<Box<dyn CategoryUnitOfWork>> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        // Serializes tree writers until COMMIT/ROLLBACK
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CATEGORY_TREE_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        Ok(Box::new(PgCategoryUnitOfWork { tx }))
    }
}

struct PgCategoryUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CategoryUnitOfWork for PgCategoryUnitOfWork {
    async fn find_by_id(&mut self, id: Uuid) -> StoreResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, display_order, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_error)
    }

    async fn exists(&mut self, id: Uuid) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(store_error)
    }

    async fn parent_links(&mut self) -> StoreResult<Vec<ParentLink>> {
        sqlx::query_as::<_, ParentLink>("SELECT id, parent_id FROM categories")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(store_error)
    }

    async fn slugs(&mut self) -> StoreResult<HashSet<String>> {
        let slugs = sqlx::query_scalar::<_, String>("SELECT slug FROM categories")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(store_error)?;

        Ok(slugs.into_iter().collect())
    }

    async fn insert(&mut self, draft: &CategoryDraft) -> StoreResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, parent_id, name, slug, description, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, parent_id, name, slug, description, display_order, created_at, updated_at
            "#,
        )
        .bind(draft.id)
        .bind(draft.parent_id)
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(&draft.description)
        .bind(draft.display_order)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(store_error)
    }

    async fn update(&mut self, draft: &CategoryDraft) -> StoreResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET parent_id = $2,
                name = $3,
                slug = $4,
                description = $5,
                display_order = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, parent_id, name, slug, description, display_order, created_at, updated_at
            "#,
        )
        .bind(draft.id)
        .bind(draft.parent_id)
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(&draft.description)
        .bind(draft.display_order)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_error)
    }

    async fn delete(&mut self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_children(&mut self, id: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(store_error)
    }

    async fn count_tools_in_category(&mut self, category_id: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tools WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(store_error)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await.map_err(store_error)
    }
}
