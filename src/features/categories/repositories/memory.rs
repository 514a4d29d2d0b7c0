use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::features::categories::models::{Category, CategoryDraft, CategoryFilter, ParentLink};
use crate::features::categories::repositories::{
    CategoryRepository, CategoryUnitOfWork, StoreError, StoreResult,
};
use crate::shared::constants::CATEGORY_SLUG_CONSTRAINT;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    categories: HashMap<Uuid, Category>,
    /// category id -> number of tools referencing it
    tools: HashMap<Uuid, i64>,
}

/// In-process store with the same guarantees as the Postgres one: units of
/// work are exclusive, see a snapshot, and only publish on commit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryRepository {
    state: Arc<Mutex<MemoryState>>,
    injected_slug_conflicts: Arc<AtomicUsize>,
    late_tool: Arc<std::sync::Mutex<Option<Uuid>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool referencing `category_id`
    pub async fn add_tool(&self, category_id: Uuid) {
        *self
            .state
            .lock()
            .await
            .tools
            .entry(category_id)
            .or_default() += 1;
    }

    pub async fn remove_tools(&self, category_id: Uuid) {
        self.state.lock().await.tools.remove(&category_id);
    }

    /// Make the next `count` writes fail as if another writer took the slug first
    pub fn inject_slug_conflicts(&self, count: usize) {
        self.injected_slug_conflicts.store(count, Ordering::SeqCst);
    }

    /// Register a tool on `category_id` inside the next delete, after any
    /// counts taken by that unit of work
    pub fn attach_tool_before_next_delete(&self, category_id: Uuid) {
        if let Ok(mut late_tool) = self.late_tool.lock() {
            *late_tool = Some(category_id);
        }
    }

    /// Overwrite a parent pointer without any validation
    pub async fn force_parent(&self, id: Uuid, parent_id: Option<Uuid>) {
        if let Some(category) = self.state.lock().await.categories.get_mut(&id) {
            category.parent_id = parent_id;
        }
    }

    pub async fn all(&self) -> Vec<Category> {
        self.state.lock().await.categories.values().cloned().collect()
    }
}

fn sort_for_listing(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(self.state.lock().await.categories.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        Ok(self
            .state
            .lock()
            .await
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list(&self, filter: CategoryFilter) -> StoreResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .state
            .lock()
            .await
            .categories
            .values()
            .filter(|c| !filter.roots_only || c.parent_id.is_none())
            .filter(|c| filter.parent_id.is_none() || c.parent_id == filter.parent_id)
            .cloned()
            .collect();
        sort_for_listing(&mut categories);
        Ok(categories)
    }

    async fn begin(&self) -> StoreResult<Box<dyn CategoryUnitOfWork>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            working,
            injected_slug_conflicts: Arc::clone(&self.injected_slug_conflicts),
            late_tool: Arc::clone(&self.late_tool),
        }))
    }
}

struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    injected_slug_conflicts: Arc<AtomicUsize>,
    late_tool: Arc<std::sync::Mutex<Option<Uuid>>>,
}

impl MemoryUnitOfWork {
    fn check_write(&self, draft: &CategoryDraft) -> StoreResult<()> {
        let injected = self
            .injected_slug_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let slug_taken = self
            .working
            .categories
            .values()
            .any(|c| c.slug == draft.slug && c.id != draft.id);

        if injected || slug_taken {
            return Err(StoreError::UniqueViolation {
                constraint: CATEGORY_SLUG_CONSTRAINT.to_string(),
            });
        }

        if let Some(parent_id) = draft.parent_id {
            if !self.working.categories.contains_key(&parent_id) {
                return Err(StoreError::ForeignKeyViolation {
                    constraint: "categories_parent_id_fkey".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CategoryUnitOfWork for MemoryUnitOfWork {
    async fn find_by_id(&mut self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(self.working.categories.get(&id).cloned())
    }

    async fn exists(&mut self, id: Uuid) -> StoreResult<bool> {
        Ok(self.working.categories.contains_key(&id))
    }

    async fn parent_links(&mut self) -> StoreResult<Vec<ParentLink>> {
        Ok(self
            .working
            .categories
            .values()
            .map(ParentLink::from)
            .collect())
    }

    async fn slugs(&mut self) -> StoreResult<HashSet<String>> {
        Ok(self
            .working
            .categories
            .values()
            .map(|c| c.slug.clone())
            .collect())
    }

    async fn insert(&mut self, draft: &CategoryDraft) -> StoreResult<Category> {
        self.check_write(draft)?;

        let now = Utc::now();
        let category = Category {
            id: draft.id,
            parent_id: draft.parent_id,
            name: draft.name.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
            display_order: draft.display_order,
            created_at: now,
            updated_at: now,
        };
        self.working
            .categories
            .insert(category.id, category.clone());

        Ok(category)
    }

    async fn update(&mut self, draft: &CategoryDraft) -> StoreResult<Option<Category>> {
        if !self.working.categories.contains_key(&draft.id) {
            return Ok(None);
        }
        self.check_write(draft)?;

        let Some(category) = self.working.categories.get_mut(&draft.id) else {
            return Ok(None);
        };
        category.parent_id = draft.parent_id;
        category.name = draft.name.clone();
        category.slug = draft.slug.clone();
        category.description = draft.description.clone();
        category.display_order = draft.display_order;
        category.updated_at = Utc::now();

        Ok(Some(category.clone()))
    }

    async fn delete(&mut self, id: Uuid) -> StoreResult<bool> {
        let late_tool = self.late_tool.lock().ok().and_then(|mut t| t.take());
        if let Some(category_id) = late_tool {
            *self.working.tools.entry(category_id).or_default() += 1;
        }

        if self.working.tools.get(&id).copied().unwrap_or(0) > 0 {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "tools_category_id_fkey".to_string(),
            });
        }

        let existed = self.working.categories.remove(&id).is_some();

        // ON DELETE SET NULL
        for category in self.working.categories.values_mut() {
            if category.parent_id == Some(id) {
                category.parent_id = None;
            }
        }

        Ok(existed)
    }

    async fn count_children(&mut self, id: Uuid) -> StoreResult<i64> {
        Ok(self
            .working
            .categories
            .values()
            .filter(|c| c.parent_id == Some(id))
            .count() as i64)
    }

    async fn count_tools_in_category(&mut self, category_id: Uuid) -> StoreResult<i64> {
        Ok(self.working.tools.get(&category_id).copied().unwrap_or(0))
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryUnitOfWork {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}
