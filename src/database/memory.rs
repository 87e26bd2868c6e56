use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::manager::DatabaseError;
use super::models::{Category, CategoryDraft};
use super::store::{CategoryContext, CategoryStore};

#[derive(Debug)]
struct MemoryState {
    next_id: i32,
    rows: BTreeMap<i32, Category>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl MemoryState {
    /// Hand out the next id. Ids are consumed even if the insert is never
    /// committed, like a database sequence.
    fn allocate_id(&mut self) -> Result<i32, DatabaseError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(DatabaseError::IdExhausted)?;
        Ok(id)
    }
}

/// In-process category store for local development and tests.
///
/// Contexts stage their changes locally and take the store lock only for the
/// duration of a single read or of `commit`, so concurrent requests never wait
/// on each other's I/O. Commits are last-write-wins. Ids are handed out
/// sequentially from 1 and never reused.
#[derive(Clone, Default)]
pub struct MemoryCategoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed rows
    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategoryContext>, DatabaseError> {
        Ok(Box::new(MemoryCategoryContext {
            state: self.state.clone(),
            staged: BTreeMap::new(),
            inserted: BTreeSet::new(),
        }))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// `Some` is an upsert, `None` a removal
type Staged = Option<Category>;

pub struct MemoryCategoryContext {
    state: Arc<Mutex<MemoryState>>,
    staged: BTreeMap<i32, Staged>,
    inserted: BTreeSet<i32>,
}

impl MemoryCategoryContext {
    async fn current(&self, id: i32) -> Option<Category> {
        match self.staged.get(&id) {
            Some(staged) => staged.clone(),
            None => self.state.lock().await.rows.get(&id).cloned(),
        }
    }
}

#[async_trait]
impl CategoryContext for MemoryCategoryContext {
    async fn find_all(&mut self) -> Result<Vec<Category>, DatabaseError> {
        let mut rows = self.state.lock().await.rows.clone();
        for (id, staged) in &self.staged {
            match staged {
                Some(category) => rows.insert(*id, category.clone()),
                None => rows.remove(id),
            };
        }
        Ok(rows.into_values().collect())
    }

    async fn find(&mut self, id: i32) -> Result<Option<Category>, DatabaseError> {
        Ok(self.current(id).await)
    }

    async fn insert(&mut self, draft: &CategoryDraft) -> Result<Category, DatabaseError> {
        let id = self.state.lock().await.allocate_id()?;

        let category = draft.clone().with_id(id);
        self.staged.insert(id, Some(category.clone()));
        self.inserted.insert(id);
        Ok(category)
    }

    async fn update(
        &mut self,
        id: i32,
        draft: &CategoryDraft,
    ) -> Result<Option<Category>, DatabaseError> {
        let Some(existing) = self.current(id).await else {
            return Ok(None);
        };

        let updated = draft.clone().with_id(existing.id);
        self.staged.insert(id, Some(updated.clone()));
        Ok(Some(updated))
    }

    async fn remove(&mut self, id: i32) -> Result<Option<Category>, DatabaseError> {
        let Some(existing) = self.current(id).await else {
            return Ok(None);
        };

        self.staged.insert(id, None);
        Ok(Some(existing))
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let MemoryCategoryContext {
            state,
            staged,
            inserted,
        } = *self;

        let mut state = state.lock().await;
        for (id, change) in staged {
            match change {
                // An update must not resurrect a row another request deleted
                Some(category) if inserted.contains(&id) || state.rows.contains_key(&id) => {
                    state.rows.insert(id, category);
                }
                Some(_) => {}
                None => {
                    state.rows.remove(&id);
                }
            }
        }
        Ok(())
    }
}
