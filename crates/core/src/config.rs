//! Redis connection settings
//!
//! Settings are persisted as JSON and passed explicitly into
//! [`RedisClient::new`](crate::store::RedisClient::new).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// File name of the settings file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
        }
    }
}

impl RedisConfig {
    /// Connection URL understood by the redis client
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    /// Load settings from `path`
    ///
    /// A missing or malformed settings file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed config file {}: {}",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Persist settings to `path`, creating parent directories as needed
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, content).await?;
        tracing::debug!("Saved Redis settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_url() {
        assert_eq!(RedisConfig::default().url(), "redis://localhost:6379/0");
    }

    #[tokio::test]
    async fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = RedisConfig::load(&temp_dir.path().join(CONFIG_FILE_NAME))
            .await
            .unwrap();
        assert_eq!(config, RedisConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = RedisConfig {
            host: "cache.internal".to_string(),
            port: 6380,
            db: 3,
        };
        config.save(&path).await.unwrap();

        let loaded = RedisConfig::load(&path).await.unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.url(), "redis://cache.internal:6380/3");
    }

    #[tokio::test]
    async fn test_malformed_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&path, "{not json").await.unwrap();

        let config = RedisConfig::load(&path).await.unwrap();
        assert_eq!(config, RedisConfig::default());
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&path, r#"{"port": 7000}"#).await.unwrap();

        let config = RedisConfig::load(&path).await.unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 7000);
        assert_eq!(config.db, 0);
    }
}
