//! Command execution and output rendering

use anyhow::Result;
use serde_json::json;
use tasker_core::task::{Task, TaskUpdate};
use tasker_core::{RedisConfig, TaskService};
use uuid::Uuid;

use crate::cli::Command;

const TURTLE: &str = "🐢";

/// Result of one command, ready to print
#[derive(Debug)]
pub enum Output {
    Added(Task),
    Tasks {
        tasks: Vec<Task>,
        empty_message: Option<&'static str>,
    },
    Found {
        id: Uuid,
        task: Option<Task>,
    },
    Deleted {
        id: Uuid,
        deleted: bool,
    },
    Updated {
        id: Uuid,
        task: Option<Task>,
    },
    Configured(RedisConfig),
}

impl Output {
    pub fn to_text(&self) -> String {
        let not_found = |id: &Uuid| format!("{TURTLE} Task {id} not found.");
        match self {
            Output::Added(task) => format!("{TURTLE} Task added: {task}"),
            Output::Tasks {
                tasks,
                empty_message,
            } => {
                if tasks.is_empty() {
                    return empty_message
                        .map(|msg| format!("{TURTLE} {msg}"))
                        .unwrap_or_default();
                }
                tasks
                    .iter()
                    .map(|task| format!("{TURTLE} {task}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Output::Found { id, task } => match task {
                Some(task) => format!("{TURTLE} {task}"),
                None => not_found(id),
            },
            Output::Deleted { id, deleted } => {
                if *deleted {
                    format!("{TURTLE} Task {id} deleted.")
                } else {
                    not_found(id)
                }
            }
            Output::Updated { id, task } => match task {
                Some(task) => format!("{TURTLE} Task updated: {task}"),
                None => not_found(id),
            },
            Output::Configured(config) => format!(
                "{TURTLE} Redis configured with host={}, port={}, db={}",
                config.host, config.port, config.db
            ),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let value = match self {
            Output::Added(task) => serde_json::to_value(task)?,
            Output::Tasks { tasks, .. } => serde_json::to_value(tasks)?,
            Output::Found { id, task } | Output::Updated { id, task } => {
                json!({ "id": id, "found": task.is_some(), "task": task })
            }
            Output::Deleted { id, deleted } => json!({ "id": id, "deleted": deleted }),
            Output::Configured(config) => serde_json::to_value(config)?,
        };
        Ok(serde_json::to_string(&value)?)
    }
}

/// Run a task command against the service
///
/// `config-redis` never reaches this point; it is handled before connecting.
pub async fn execute(service: &TaskService, command: Command) -> Result<Output> {
    let output = match command {
        Command::Add {
            name,
            priority,
            description,
        } => Output::Added(service.add_task(name, priority, description).await?),
        Command::List => Output::Tasks {
            tasks: service.get_all_tasks().await?,
            empty_message: None,
        },
        Command::Get { id } => Output::Found {
            id,
            task: service.get_task(id).await?,
        },
        Command::GetByPriority { priority } => Output::Tasks {
            tasks: service.get_tasks_by_priority(priority).await?,
            empty_message: Some("No tasks found with the specified priority."),
        },
        Command::GetByPriorityRange {
            min_priority,
            max_priority,
        } => Output::Tasks {
            tasks: service
                .get_tasks_by_priority_range(min_priority, max_priority)
                .await?,
            empty_message: Some("No tasks found within the specified priority range."),
        },
        Command::Delete { id } => Output::Deleted {
            id,
            deleted: service.delete_task(id).await?,
        },
        Command::Update {
            id,
            name,
            priority,
            description,
        } => {
            let update = TaskUpdate {
                name,
                priority,
                description,
            };
            Output::Updated {
                id,
                task: service.update_task(id, update).await?,
            }
        }
        Command::ConfigRedis { .. } => {
            anyhow::bail!("config-redis does not operate on tasks")
        }
    };
    Ok(output)
}
