//! Redis connection bootstrap

use redis::aio::MultiplexedConnection;

use crate::config::RedisConfig;
use crate::{Error, Result};

/// Owns the connection to a Redis server
///
/// The connection is opened by [`connect`](Self::connect) and released by
/// [`close`](Self::close) or when the client is dropped.
pub struct RedisClient {
    config: RedisConfig,
    connection: Option<MultiplexedConnection>,
}

impl RedisClient {
    /// Create a client for the given settings without connecting
    pub fn new(config: RedisConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Open the connection and check it with a PING
    pub async fn connect(&mut self) -> Result<()> {
        let url = self.config.url();
        let client = redis::Client::open(url.as_str())
            .map_err(|e| Error::Connection(format!("Failed to connect to Redis: {}", e)))?;
        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let _pong: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|e| Error::Connection(format!("Failed to connect to Redis: {}", e)))?;

        tracing::debug!("Connected to Redis at {}", url);
        self.connection = Some(connection);
        Ok(())
    }

    /// Get a handle to the open connection
    pub fn get_client(&self) -> Result<MultiplexedConnection> {
        self.connection.clone().ok_or_else(|| {
            Error::Connection("Redis client is not connected. Call connect() first.".to_string())
        })
    }

    /// Drop the connection
    pub fn close(&mut self) {
        if self.connection.take().is_some() {
            tracing::debug!("Closed Redis connection");
        }
    }
}
