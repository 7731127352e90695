//! Redis task storage implementation
//!
//! # Key Design
//!
//! - `task:{id}` -> hash with the string fields `id`, `name`, `priority`,
//!   `description`, `timestamp`
//! - `tasks` -> ZSET with `task:{id}` as member and
//!   `priority + timestamp / 1e10` as score
//!
//! Record and index writes go through one `MULTI/EXEC` pipeline. Index
//! members whose record has vanished are skipped on read.

use async_trait::async_trait;
use chrono::DateTime;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::HashMap;
use uuid::Uuid;

use super::model::{Priority, Task};
use super::repository::TaskRepository;
use crate::store::RedisClient;
use crate::{Error, Result};

/// Prefix for task keys.
const TASK_KEY_PREFIX: &str = "task:";

/// Key for the priority index (sorted set).
const TASK_INDEX_KEY: &str = "tasks";

/// Keeps the top of a priority range below the next priority bucket.
const RANGE_EPSILON: f64 = 1e-10;

fn task_key(id: Uuid) -> String {
    format!("{TASK_KEY_PREFIX}{id}")
}

/// Priority dominates; creation time breaks ties within a priority.
fn score(task: &Task) -> f64 {
    f64::from(task.priority().get()) + task.timestamp() / 1e10
}

/// Inclusive score window covering every task with priority in `min..=max`
fn score_range(min: Priority, max: Priority) -> (f64, f64) {
    (
        f64::from(min.get()),
        f64::from(max.get()) + 1.0 - RANGE_EPSILON,
    )
}

fn task_fields(task: &Task) -> [(&'static str, String); 5] {
    [
        ("id", task.id().to_string()),
        ("name", task.name().to_string()),
        ("priority", task.priority().to_string()),
        ("description", task.description().to_string()),
        ("timestamp", format!("{:.6}", task.timestamp())),
    ]
}

/// Rebuild a task from the fields of its hash
fn task_from_fields(key: &str, mut fields: HashMap<String, String>) -> Result<Task> {
    let malformed = |reason: String| Error::MalformedRecord {
        key: key.to_string(),
        reason,
    };
    let mut take = |name: &str| {
        fields
            .remove(name)
            .ok_or_else(|| malformed(format!("missing field `{name}`")))
    };

    let id = take("id")?;
    let name = take("name")?;
    let priority = take("priority")?;
    let description = take("description")?;
    let timestamp = take("timestamp")?;

    let id = Uuid::parse_str(&id).map_err(|e| malformed(format!("invalid id: {e}")))?;
    let priority: i64 = priority
        .parse()
        .map_err(|e| malformed(format!("invalid priority: {e}")))?;
    let seconds: f64 = timestamp
        .parse()
        .map_err(|e| malformed(format!("invalid timestamp: {e}")))?;
    if !seconds.is_finite() {
        return Err(malformed(format!("invalid timestamp: {timestamp}")));
    }
    let created_at = DateTime::from_timestamp_micros((seconds * 1e6).round() as i64)
        .ok_or_else(|| malformed(format!("timestamp out of range: {timestamp}")))?;

    Task::from_parts(id, name, priority, description, created_at)
        .map_err(|e| malformed(e.to_string()))
}

/// Redis implementation of `TaskRepository`
#[derive(Clone)]
pub struct RedisTaskStore {
    connection: MultiplexedConnection,
}

impl RedisTaskStore {
    /// Create a store on top of a connected client
    ///
    /// Fails with `Error::Connection` if the client has not connected yet.
    pub fn new(client: &RedisClient) -> Result<Self> {
        Ok(Self {
            connection: client.get_client()?,
        })
    }

    /// Write the record and its index entry atomically
    async fn write_task(&self, task: &Task, context: &str) -> Result<()> {
        let key = task_key(task.id());
        let mut connection = self.connection.clone();

        let () = redis::pipe()
            .atomic()
            .hset_multiple(&key, &task_fields(task)[..])
            .ignore()
            .zadd(TASK_INDEX_KEY, &key, score(task))
            .ignore()
            .query_async(&mut connection)
            .await
            .map_err(|e| Error::operation(context, e))?;
        Ok(())
    }

    /// Load the records behind a list of index members, in order
    async fn fetch_members(&self, members: Vec<String>, context: &str) -> Result<Vec<Task>> {
        if members.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for member in &members {
            pipe.hgetall(member);
        }
        let mut connection = self.connection.clone();
        let records: Vec<HashMap<String, String>> = pipe
            .query_async(&mut connection)
            .await
            .map_err(|e| Error::operation(context, e))?;

        let mut tasks = Vec::with_capacity(members.len());
        for (member, fields) in members.into_iter().zip(records) {
            if fields.is_empty() {
                tracing::warn!(member = %member, "Skipping index entry without a task record");
                continue;
            }
            tasks.push(task_from_fields(&member, fields)?);
        }
        Ok(tasks)
    }
}

#[async_trait]
impl TaskRepository for RedisTaskStore {
    async fn add(&self, task: Task) -> Result<Task> {
        self.write_task(&task, "Failed to add task").await?;
        tracing::debug!(task_id = %task.id(), "Stored task in Redis");
        Ok(task)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let key = task_key(id);
        let mut connection = self.connection.clone();
        let fields: HashMap<String, String> = connection
            .hgetall(&key)
            .await
            .map_err(|e| Error::operation("Failed to retrieve task", e))?;

        if fields.is_empty() {
            return Ok(None);
        }
        task_from_fields(&key, fields).map(Some)
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let mut connection = self.connection.clone();
        let members: Vec<String> = connection
            .zrange(TASK_INDEX_KEY, 0, -1)
            .await
            .map_err(|e| Error::operation("Failed to list tasks", e))?;

        self.fetch_members(members, "Failed to list tasks").await
    }

    async fn list_by_priority_range(&self, min: Priority, max: Priority) -> Result<Vec<Task>> {
        if min > max {
            return Ok(Vec::new());
        }
        let (low, high) = score_range(min, max);
        let mut connection = self.connection.clone();
        let members: Vec<String> = connection
            .zrangebyscore(TASK_INDEX_KEY, low, high)
            .await
            .map_err(|e| Error::operation("Failed to list tasks by priority", e))?;

        self.fetch_members(members, "Failed to list tasks by priority")
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let key = task_key(id);
        let mut connection = self.connection.clone();
        let (removed, _unindexed): (i64, i64) = redis::pipe()
            .atomic()
            .del(&key)
            .zrem(TASK_INDEX_KEY, &key)
            .query_async(&mut connection)
            .await
            .map_err(|e| Error::operation("Failed to delete task", e))?;

        Ok(removed > 0)
    }

    async fn update(&self, task: Task) -> Result<Option<Task>> {
        let mut connection = self.connection.clone();
        let exists: bool = connection
            .exists(task_key(task.id()))
            .await
            .map_err(|e| Error::operation("Failed to update task", e))?;
        if !exists {
            return Ok(None);
        }

        self.write_task(&task, "Failed to update task").await?;
        Ok(Some(task))
    }
}
