//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Redis connection error: {0}")]
    Connection(String),

    #[error("Redis operation failed: {context}: {source}")]
    Operation {
        context: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("Malformed task record {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a failed store command with a short description of what was attempted
    pub fn operation(context: impl Into<String>, source: redis::RedisError) -> Self {
        Self::Operation {
            context: context.into(),
            source,
        }
    }

    /// True for failures of an individual store operation, including unreadable records
    pub fn is_operation(&self) -> bool {
        matches!(self, Self::Operation { .. } | Self::MalformedRecord { .. })
    }
}
