//! Configuration loading utilities.

use super::types::ServerConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Load configuration from layered sources: embedded defaults, an optional
/// file, then environment variables.
pub struct ConfigLoader {
    config_path: Option<String>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: "VIGIL".to_string(),
        }
    }

    /// Set config file path.
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration.
    pub fn load(&self) -> Result<ServerConfig> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            include_str!("defaults.toml"),
            config::FileFormat::Toml,
        ));

        if let Some(path) = &self.config_path {
            if Path::new(path).exists() {
                info!(path = %path, "Loading config file");
                builder = builder.add_source(config::File::with_name(path));
            }
        }

        // VIGIL__SERVER__PORT=9000 -> server.port
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration, reading an optional file path from `CONFIG_PATH`.
pub fn load_config() -> Result<ServerConfig> {
    let mut loader = ConfigLoader::new();
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        loader = loader.with_config_path(path);
    }

    loader.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use std::io::Write;

    #[test]
    fn test_defaults_load() {
        let config = ConfigLoader::new()
            .with_env_prefix("VIGIL_TEST_UNSET")
            .load()
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.body_limit_bytes, 1024 * 1024);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.audit_capacity, None);
        assert_eq!(config.logging.level, "info");
        assert!(config.cors.allow_any_origin);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[storage]\nbackend = \"sqlite\"\nsqlite_path = \"/tmp/alerts.db\"\naudit_capacity = 500"
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_config_path(file.path().to_string_lossy())
            .with_env_prefix("VIGIL_TEST_UNSET")
            .load()
            .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.sqlite_path, "/tmp/alerts.db");
        assert_eq!(config.storage.audit_capacity, Some(500));
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config = ConfigLoader::new()
            .with_config_path("/nonexistent/vigil.toml")
            .with_env_prefix("VIGIL_TEST_UNSET")
            .load()
            .unwrap();

        assert_eq!(config.server.port, 3000);
    }
}
