//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Priority, Task};
use crate::Result;

/// Repository interface for task CRUD operations
///
/// Listings are ordered by ascending priority, then creation time, then id.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a task, overwriting any existing task with the same ID
    async fn add(&self, task: Task) -> Result<Task>;

    /// Get a task by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>>;

    /// Get all tasks
    async fn list(&self) -> Result<Vec<Task>>;

    /// Get tasks whose priority lies in `min..=max`
    async fn list_by_priority_range(&self, min: Priority, max: Priority) -> Result<Vec<Task>>;

    /// Delete a task by ID, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Replace an existing task
    ///
    /// Returns `None` without writing anything if no task has this ID.
    async fn update(&self, task: Task) -> Result<Option<Task>>;
}
