//! Store module
//!
//! Connection management for the Redis backend.

mod client;

pub use client::RedisClient;
