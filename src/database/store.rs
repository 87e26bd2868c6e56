//! Storage seam for the `categories` collection.
//!
//! A [`CategoryStore`] is shared by the whole process. Every request opens its
//! own [`CategoryContext`] through [`CategoryStore::begin`], works against it,
//! and calls [`CategoryContext::commit`] before responding. A context that is
//! dropped without committing leaves storage untouched.

use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Category, CategoryDraft};

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Open a request-scoped data context
    async fn begin(&self) -> Result<Box<dyn CategoryContext>, DatabaseError>;

    /// Connectivity check used by `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait CategoryContext: Send {
    /// All categories in storage order
    async fn find_all(&mut self) -> Result<Vec<Category>, DatabaseError>;

    async fn find(&mut self, id: i32) -> Result<Option<Category>, DatabaseError>;

    /// Insert and return the stored record with its assigned id
    async fn insert(&mut self, draft: &CategoryDraft) -> Result<Category, DatabaseError>;

    /// Overwrite name and status of an existing record. `None` if absent.
    async fn update(
        &mut self,
        id: i32,
        draft: &CategoryDraft,
    ) -> Result<Option<Category>, DatabaseError>;

    /// Remove a record and return its last values. `None` if absent.
    async fn remove(&mut self, id: i32) -> Result<Option<Category>, DatabaseError>;

    /// Make every change in this context durable
    async fn commit(self: Box<Self>) -> Result<(), DatabaseError>;
}
