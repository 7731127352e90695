//! Command-line definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "tasker")]
#[command(about = "A task manager backed by Redis")]
#[command(version)]
pub struct Cli {
    /// Directory holding the Redis settings file
    #[arg(long, global = true, env = "TASKER_DATA_DIR", default_value = ".tasker")]
    pub data_dir: PathBuf,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task name
        name: String,
        /// Priority from 1 to 10, lower values listed first
        #[arg(allow_negative_numbers = true)]
        priority: i64,
        /// Task description
        description: String,
    },

    /// List all tasks by priority
    #[command(visible_alias = "list-tasks")]
    List,

    /// Show a single task
    Get {
        /// Task ID
        id: Uuid,
    },

    /// List tasks with exactly this priority
    GetByPriority {
        #[arg(allow_negative_numbers = true)]
        priority: i64,
    },

    /// List tasks with a priority between MIN and MAX inclusive
    GetByPriorityRange {
        #[arg(allow_negative_numbers = true)]
        min_priority: i64,
        #[arg(allow_negative_numbers = true)]
        max_priority: i64,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: Uuid,
    },

    /// Update fields of a task
    Update {
        /// Task ID
        id: Uuid,
        /// New name of the task
        #[arg(long)]
        name: Option<String>,
        /// New priority of the task
        #[arg(long, allow_negative_numbers = true)]
        priority: Option<i64>,
        /// New description of the task
        #[arg(long)]
        description: Option<String>,
    },

    /// Save Redis connection settings
    ConfigRedis {
        /// Redis server host
        #[arg(long, default_value = "localhost")]
        host: String,
        /// Redis server port
        #[arg(long, default_value_t = 6379)]
        port: u16,
        /// Redis database number
        #[arg(long, default_value_t = 0)]
        db: i64,
    },
}
