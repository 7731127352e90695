//! Task model definitions

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Task priority, an integer between 1 and 10 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(1);
    pub const MAX: Priority = Priority(10);

    /// Validate a raw priority value
    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN.0 as i64..=Self::MAX.0 as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(Error::Validation(format!(
                "Priority must be between {} and {}, got {}",
                Self::MIN.0,
                Self::MAX.0,
                value
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl TryFrom<i64> for Priority {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Partial update for a task. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub priority: Option<i64>,
    pub description: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.priority.is_none() && self.description.is_none()
    }
}

/// A validated task
///
/// `id` and `created_at` are fixed at creation; `name` is never empty and
/// `priority` always lies in `Priority::MIN..=Priority::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: Uuid,
    name: String,
    priority: Priority,
    description: String,
    created_at: DateTime<Utc>,
}

/// Unchecked wire form of a task; deserializing goes through `from_parts`
#[derive(Deserialize)]
struct TaskRecord {
    id: Uuid,
    name: String,
    priority: i64,
    description: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = Error;

    fn try_from(record: TaskRecord) -> Result<Self> {
        Task::from_parts(
            record.id,
            record.name,
            record.priority,
            record.description,
            record.created_at,
        )
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("Name cannot be empty".to_string()));
    }
    Ok(())
}

impl Task {
    /// Create a new task with a fresh id and the current time
    pub fn new(
        name: impl Into<String>,
        priority: i64,
        description: impl Into<String>,
    ) -> Result<Self> {
        // Microsecond precision survives the round trip through stored records
        Self::from_parts(
            Uuid::new_v4(),
            name,
            priority,
            description,
            Utc::now().trunc_subsecs(6),
        )
    }

    /// Rebuild a task from stored values, keeping the given id and timestamp
    pub fn from_parts(
        id: Uuid,
        name: impl Into<String>,
        priority: i64,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        let priority = Priority::new(priority)?;

        Ok(Self {
            id,
            name,
            priority,
            description: description.into(),
            created_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Creation time in fractional seconds since the Unix epoch
    pub fn timestamp(&self) -> f64 {
        self.created_at.timestamp_micros() as f64 / 1e6
    }

    /// Merge a partial update into this task
    ///
    /// Every supplied field is validated before anything is changed, so a
    /// rejected update leaves the task untouched.
    pub fn apply(&mut self, update: TaskUpdate) -> Result<()> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }
        let priority = update.priority.map(Priority::new).transpose()?;

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (priority {})",
            self.id, self.name, self.priority
        )?;
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        write!(
            f,
            ", created {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
