//! Tasker CLI
//!
//! Each invocation loads the Redis settings, connects, runs one task
//! command and disconnects.

mod cli;
mod commands;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasker_core::config::CONFIG_FILE_NAME;
use tasker_core::store::RedisClient;
use tasker_core::task::RedisTaskStore;
use tasker_core::{RedisConfig, TaskService};

use crate::cli::{Cli, Command};
use crate::commands::Output;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli.data_dir.join(CONFIG_FILE_NAME);

    let output = match cli.command {
        Command::ConfigRedis { host, port, db } => {
            let config = RedisConfig { host, port, db };
            config
                .save(&config_path)
                .await
                .with_context(|| format!("Failed to save {}", config_path.display()))?;
            Output::Configured(config)
        }
        command => run_task_command(&config_path, command).await?,
    };

    let rendered = if cli.json {
        output.to_json()?
    } else {
        output.to_text()
    };
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}

async fn run_task_command(config_path: &Path, command: Command) -> Result<Output> {
    let config = RedisConfig::load(config_path)
        .await
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    tracing::debug!("Using Redis at {}", config.url());

    let mut client = RedisClient::new(config);
    client
        .connect()
        .await
        .context("Failed to connect to Redis")?;

    let store = RedisTaskStore::new(&client)?;
    let service = TaskService::new(Arc::new(store));
    let result = commands::execute(&service, command).await;

    drop(service);
    client.close();
    result
}
