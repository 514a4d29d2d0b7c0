//! Parent-pointer view of the category forest.
//!
//! The forest is rebuilt from `(id, parent_id)` rows for every validation and
//! never cached. Traversals keep a visited set so that rows which already form
//! a cycle (e.g. edited by hand) cannot make them loop.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::features::categories::models::ParentLink;

#[derive(Debug, Clone, Default)]
pub struct CategoryForest {
    parents: HashMap<Uuid, Option<Uuid>>,
}

impl CategoryForest {
    pub fn from_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = ParentLink>,
    {
        Self {
            parents: links
                .into_iter()
                .map(|link| (link.id, link.parent_id))
                .collect(),
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.parents.contains_key(&id)
    }

    /// The forest as it would look after re-pointing `id` at `parent_id`
    pub fn with_parent(&self, id: Uuid, parent_id: Option<Uuid>) -> Self {
        let mut parents = self.parents.clone();
        parents.insert(id, parent_id);
        Self { parents }
    }

    fn children_index(&self) -> HashMap<Uuid, Vec<Uuid>> {
        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (&id, parent_id) in &self.parents {
            if let Some(parent_id) = parent_id {
                children.entry(*parent_id).or_default().push(id);
            }
        }
        children
    }

    /// Every category reachable from `id` by following child edges, excluding `id`
    pub fn descendant_ids(&self, id: Uuid) -> HashSet<Uuid> {
        let children = self.children_index();
        let mut visited = HashSet::from([id]);
        let mut descendants = HashSet::new();
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            for &child in children.get(&current).into_iter().flatten() {
                if visited.insert(child) {
                    descendants.insert(child);
                    queue.push_back(child);
                }
            }
        }

        descendants
    }

    /// Whether making `new_parent_id` the parent of `id` closes a loop.
    ///
    /// Evaluated on the forest with the proposed edge applied.
    pub fn would_create_cycle(&self, id: Uuid, new_parent_id: Uuid) -> bool {
        if id == new_parent_id {
            return true;
        }
        self.with_parent(id, Some(new_parent_id))
            .descendant_ids(id)
            .contains(&new_parent_id)
    }

    /// Whether some category is its own ancestor
    pub fn has_cycle(&self) -> bool {
        self.parents
            .keys()
            .any(|&id| self.ancestors_reach(id, id))
    }

    fn ancestors_reach(&self, start: Uuid, target: Uuid) -> bool {
        let mut visited = HashSet::new();
        let mut current = self.parents.get(&start).copied().flatten();
        while let Some(id) = current {
            if id == target {
                return true;
            }
            if !visited.insert(id) {
                return false;
            }
            current = self.parents.get(&id).copied().flatten();
        }
        false
    }
}
