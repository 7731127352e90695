//! Core library for Tasker
//!
//! This crate contains the core business logic, including:
//! - Task validation and the task repository contract
//! - In-memory and Redis-backed repositories
//! - Redis connection settings and bootstrap
//! - The task service used by the CLI

pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod task;

pub use config::RedisConfig;
pub use error::Error;
pub use service::TaskService;
pub type Result<T> = std::result::Result<T, Error>;
