//! Task service
//!
//! Turns CLI-level requests into repository calls.

use std::sync::Arc;

use uuid::Uuid;

use crate::task::{Priority, Task, TaskRepository, TaskUpdate};
use crate::Result;

/// Task operations on top of any `TaskRepository`
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a new task
    pub async fn add_task(
        &self,
        name: impl Into<String>,
        priority: i64,
        description: impl Into<String>,
    ) -> Result<Task> {
        let task = Task::new(name, priority, description)?;
        let task = self.repository.add(task).await?;
        tracing::info!(task_id = %task.id(), priority = %task.priority(), "Task added");
        Ok(task)
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
        self.repository.get_by_id(id).await
    }

    pub async fn get_all_tasks(&self) -> Result<Vec<Task>> {
        self.repository.list().await
    }

    pub async fn get_tasks_by_priority(&self, priority: i64) -> Result<Vec<Task>> {
        self.get_tasks_by_priority_range(priority, priority).await
    }

    /// Tasks with priority in `min..=max`
    ///
    /// Bounds are filters, not priorities: they are clamped to the valid
    /// priority range, and a range with no valid priority yields no tasks.
    pub async fn get_tasks_by_priority_range(&self, min: i64, max: i64) -> Result<Vec<Task>> {
        let lower = min.max(i64::from(Priority::MIN.get()));
        let upper = max.min(i64::from(Priority::MAX.get()));
        if lower > upper {
            return Ok(Vec::new());
        }
        let min = Priority::new(lower)?;
        let max = Priority::new(upper)?;
        tracing::debug!(%min, %max, "Listing tasks by priority");
        self.repository.list_by_priority_range(min, max).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<bool> {
        let deleted = self.repository.delete(id).await?;
        tracing::info!(task_id = %id, deleted, "Task delete requested");
        Ok(deleted)
    }

    /// Merge the supplied fields into an existing task and store it
    ///
    /// Returns `Ok(None)` if no task has this ID. Fields left as `None` keep
    /// their current values.
    pub async fn update_task(&self, id: Uuid, update: TaskUpdate) -> Result<Option<Task>> {
        let Some(mut task) = self.repository.get_by_id(id).await? else {
            tracing::debug!(task_id = %id, "Task to update not found");
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(task));
        }

        task.apply(update)?;
        let updated = self.repository.update(task).await?;
        if updated.is_some() {
            tracing::info!(task_id = %id, "Task updated");
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::MemoryTaskStore;
    use crate::Error;
    use async_trait::async_trait;

    fn create_test_service() -> (TaskService, MemoryTaskStore) {
        let store = MemoryTaskStore::new();
        let service = TaskService::new(Arc::new(store.clone()));
        (service, store)
    }

    fn priorities(tasks: &[Task]) -> Vec<u8> {
        tasks.iter().map(|t| t.priority().get()).collect()
    }

    #[tokio::test]
    async fn test_add_task() {
        let (service, store) = create_test_service();

        let task = service.add_task("Test Task", 5, "A task").await.unwrap();
        assert_eq!(task.name(), "Test Task");
        assert_eq!(task.priority().get(), 5);
        assert_eq!(task.description(), "A task");

        assert_eq!(store.get_by_id(task.id()).await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn test_add_invalid_task_stores_nothing() {
        let (service, store) = create_test_service();

        assert!(matches!(
            service.add_task("Bad", 11, "").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.add_task("", 3, "").await,
            Err(Error::Validation(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_task() {
        let (service, _store) = create_test_service();

        let task = service.add_task("Find me", 2, "").await.unwrap();
        assert_eq!(service.get_task(task.id()).await.unwrap(), Some(task));
        assert!(service.get_task(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_tasks() {
        let (service, _store) = create_test_service();

        service.add_task("Task 1", 5, "First").await.unwrap();
        service.add_task("Task 2", 3, "Second").await.unwrap();

        let tasks = service.get_all_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(priorities(&tasks), vec![3, 5]);
    }

    #[tokio::test]
    async fn test_get_tasks_by_priority() {
        let (service, _store) = create_test_service();

        service.add_task("Task 1", 5, "First").await.unwrap();
        service.add_task("Task 2", 3, "Second").await.unwrap();
        service.add_task("Task 3", 5, "Third").await.unwrap();

        let tasks = service.get_tasks_by_priority(5).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.priority().get() == 5));
    }

    #[tokio::test]
    async fn test_get_tasks_by_priority_range() {
        let (service, _store) = create_test_service();

        service.add_task("Task 1", 5, "First").await.unwrap();
        service.add_task("Task 2", 3, "Second").await.unwrap();
        service.add_task("Task 3", 7, "Third").await.unwrap();

        let tasks = service.get_tasks_by_priority_range(4, 6).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name(), "Task 1");

        let tasks = service.get_tasks_by_priority_range(3, 7).await.unwrap();
        assert_eq!(priorities(&tasks), vec![3, 5, 7]);
    }

    #[tokio::test]
    async fn test_priority_range_bounds_are_clamped() {
        let (service, _store) = create_test_service();

        service.add_task("Urgent", 1, "").await.unwrap();
        service.add_task("Normal", 5, "").await.unwrap();
        service.add_task("Someday", 10, "").await.unwrap();

        let tasks = service.get_tasks_by_priority_range(0, 5).await.unwrap();
        assert_eq!(priorities(&tasks), vec![1, 5]);

        let tasks = service.get_tasks_by_priority_range(9, 99).await.unwrap();
        assert_eq!(priorities(&tasks), vec![10]);

        let tasks = service.get_tasks_by_priority_range(-3, 0).await.unwrap();
        assert!(tasks.is_empty());

        let tasks = service.get_tasks_by_priority_range(11, 20).await.unwrap();
        assert!(tasks.is_empty());

        let tasks = service.get_tasks_by_priority_range(8, 2).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_single_priority_finds_nothing() {
        let (service, _store) = create_test_service();

        service.add_task("Urgent", 1, "").await.unwrap();
        service.add_task("Someday", 10, "").await.unwrap();

        assert!(service.get_tasks_by_priority(0).await.unwrap().is_empty());
        assert!(service.get_tasks_by_priority(11).await.unwrap().is_empty());
        assert_eq!(
            priorities(&service.get_tasks_by_priority(10).await.unwrap()),
            vec![10]
        );
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (service, _store) = create_test_service();

        let task = service.add_task("Task 1", 5, "First").await.unwrap();
        assert!(service.delete_task(task.id()).await.unwrap());
        assert!(service.get_all_tasks().await.unwrap().is_empty());

        assert!(!service.delete_task(task.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_task_changes_only_supplied_fields() {
        let (service, _store) = create_test_service();

        let task = service.add_task("Task 1", 2, "First").await.unwrap();
        let updated = service
            .update_task(
                task.id(),
                TaskUpdate {
                    priority: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.priority().get(), 5);
        assert_eq!(updated.name(), "Task 1");
        assert_eq!(updated.description(), "First");
        assert_eq!(updated.id(), task.id());
        assert_eq!(updated.created_at(), task.created_at());

        let stored = service.get_task(task.id()).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_all_fields() {
        let (service, _store) = create_test_service();

        let task = service.add_task("Task 1", 5, "First").await.unwrap();
        let updated = service
            .update_task(
                task.id(),
                TaskUpdate {
                    name: Some("Updated Task".to_string()),
                    priority: Some(7),
                    description: Some("Updated".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name(), "Updated Task");
        assert_eq!(updated.priority().get(), 7);
        assert_eq!(updated.description(), "Updated");
    }

    #[tokio::test]
    async fn test_empty_update_returns_current_task() {
        let (service, _store) = create_test_service();

        let task = service.add_task("Task 1", 5, "First").await.unwrap();
        let result = service
            .update_task(task.id(), TaskUpdate::default())
            .await
            .unwrap();
        assert_eq!(result, Some(task));
    }

    #[tokio::test]
    async fn test_update_nonexistent_task() {
        let (service, store) = create_test_service();

        let result = service
            .update_task(
                Uuid::new_v4(),
                TaskUpdate {
                    name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_stored_task() {
        let (service, _store) = create_test_service();

        let task = service.add_task("Task 1", 5, "First").await.unwrap();
        let result = service
            .update_task(
                task.id(),
                TaskUpdate {
                    priority: Some(0),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(service.get_task(task.id()).await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn test_add_list_range_delete_scenario() {
        let (service, _store) = create_test_service();

        service.add_task("three", 3, "").await.unwrap();
        service.add_task("seven", 7, "").await.unwrap();
        let one = service.add_task("one", 1, "").await.unwrap();

        assert_eq!(priorities(&service.get_all_tasks().await.unwrap()), vec![1, 3, 7]);
        assert_eq!(
            priorities(&service.get_tasks_by_priority_range(2, 7).await.unwrap()),
            vec![3, 7]
        );

        assert!(service.delete_task(one.id()).await.unwrap());
        assert_eq!(priorities(&service.get_all_tasks().await.unwrap()), vec![3, 7]);
    }

    /// Repository whose every call fails like a dropped connection
    struct FailingRepository;

    fn broken() -> Error {
        Error::operation(
            "Failed to reach store",
            redis::RedisError::from((redis::ErrorKind::IoError, "connection reset")),
        )
    }

    #[async_trait]
    impl TaskRepository for FailingRepository {
        async fn add(&self, _task: Task) -> Result<Task> {
            Err(broken())
        }
        async fn get_by_id(&self, _id: Uuid) -> Result<Option<Task>> {
            Err(broken())
        }
        async fn list(&self) -> Result<Vec<Task>> {
            Err(broken())
        }
        async fn list_by_priority_range(&self, _min: Priority, _max: Priority) -> Result<Vec<Task>> {
            Err(broken())
        }
        async fn delete(&self, _id: Uuid) -> Result<bool> {
            Err(broken())
        }
        async fn update(&self, _task: Task) -> Result<Option<Task>> {
            Err(broken())
        }
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let service = TaskService::new(Arc::new(FailingRepository));

        assert!(service.add_task("x", 1, "").await.unwrap_err().is_operation());
        assert!(service.get_all_tasks().await.unwrap_err().is_operation());
        assert!(service.get_tasks_by_priority(3).await.unwrap_err().is_operation());
        assert!(service.delete_task(Uuid::new_v4()).await.unwrap_err().is_operation());
        assert!(service
            .update_task(Uuid::new_v4(), TaskUpdate::default())
            .await
            .unwrap_err()
            .is_operation());
    }
}
