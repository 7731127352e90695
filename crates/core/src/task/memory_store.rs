//! In-memory task storage implementation
//!
//! Keeps tasks in a map with a sorted priority index next to it.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Priority, Task};
use super::repository::TaskRepository;
use crate::Result;

/// Sort key for the priority index: (priority, created_at in microseconds, id)
type IndexKey = (Priority, i64, Uuid);

fn index_key(task: &Task) -> IndexKey {
    (task.priority(), task.created_at().timestamp_micros(), task.id())
}

#[derive(Default)]
struct MemoryState {
    tasks: HashMap<Uuid, Task>,
    index: BTreeSet<IndexKey>,
}

impl MemoryState {
    /// Insert or replace a task, keeping the index in step
    fn put(&mut self, task: Task) {
        if let Some(previous) = self.tasks.insert(task.id(), task.clone()) {
            self.index.remove(&index_key(&previous));
        }
        self.index.insert(index_key(&task));
    }

    fn resolve<'a>(&self, keys: impl Iterator<Item = &'a IndexKey>) -> Vec<Task> {
        keys.filter_map(|(_, _, id)| self.tasks.get(id).cloned())
            .collect()
    }
}

/// In-memory task store
#[derive(Clone, Default)]
pub struct MemoryTaskStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryTaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskStore {
    async fn add(&self, task: Task) -> Result<Task> {
        let mut state = self.state.write().await;
        state.put(task.clone());
        tracing::debug!(task_id = %task.id(), "Stored task in memory");
        Ok(task)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let state = self.state.read().await;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let state = self.state.read().await;
        Ok(state.resolve(state.index.iter()))
    }

    async fn list_by_priority_range(&self, min: Priority, max: Priority) -> Result<Vec<Task>> {
        if min > max {
            return Ok(Vec::new());
        }
        let state = self.state.read().await;
        let lower = (min, i64::MIN, Uuid::nil());
        let upper = (max, i64::MAX, Uuid::from_u128(u128::MAX));
        Ok(state.resolve(state.index.range(lower..=upper)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.tasks.remove(&id) {
            Some(task) => {
                state.index.remove(&index_key(&task));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update(&self, task: Task) -> Result<Option<Task>> {
        let mut state = self.state.write().await;
        if !state.tasks.contains_key(&task.id()) {
            return Ok(None);
        }
        state.put(task.clone());
        Ok(Some(task))
    }
}
