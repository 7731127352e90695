//! Task module
//!
//! This module contains task-related types and the storage backends.

mod memory_store;
mod model;
mod redis_store;
mod repository;

pub use memory_store::MemoryTaskStore;
pub use model::*;
pub use redis_store::RedisTaskStore;
pub use repository::TaskRepository;
