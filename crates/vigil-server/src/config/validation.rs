//! Configuration validation.

use super::types::{ServerConfig, StorageBackend};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Request timeout must be at least one second")]
    InvalidTimeout,

    #[error("Body limit must be greater than zero")]
    InvalidBodyLimit,

    #[error("SQLite backend selected but sqlite_path is empty")]
    MissingSqlitePath,

    #[error("max_connections must be at least 1")]
    InvalidPoolSize,

    #[error("audit_capacity must be greater than zero")]
    InvalidAuditCapacity,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

/// Validate server configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    if config.server.socket_addr().is_err() {
        errors.push(ConfigError::InvalidAddress(config.server.host.clone()));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ConfigError::InvalidTimeout);
    }

    if config.server.body_limit_bytes == 0 {
        errors.push(ConfigError::InvalidBodyLimit);
    }

    if config.storage.backend == StorageBackend::Sqlite {
        if config.storage.sqlite_path.trim().is_empty() {
            errors.push(ConfigError::MissingSqlitePath);
        }
        if config.storage.max_connections == 0 {
            errors.push(ConfigError::InvalidPoolSize);
        }
    }

    if config.storage.audit_capacity == Some(0) {
        errors.push(ConfigError::InvalidAuditCapacity);
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }

    let valid_formats = ["pretty", "compact", "json"];
    if !valid_formats.contains(&config.logging.format.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    for origin in &config.cors.allowed_origins {
        if origin.parse::<axum::http::HeaderValue>().is_err() {
            errors.push(ConfigError::InvalidCorsOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        config.server.port = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidPort(0))));
    }

    #[test]
    fn test_invalid_address() {
        let mut config = ServerConfig::default();
        config.server.host = "not a host".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidAddress(_))));
    }

    #[test]
    fn test_sqlite_requires_path() {
        let mut config = ServerConfig::default();
        config.storage.backend = StorageBackend::Sqlite;
        config.storage.sqlite_path = "  ".to_string();
        config.storage.max_connections = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| matches!(e, ConfigError::MissingSqlitePath)));
        assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidPoolSize)));
    }

    #[test]
    fn test_sqlite_fields_ignored_for_memory() {
        let mut config = ServerConfig::default();
        config.storage.sqlite_path = String::new();

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServerConfig::default();
        config.server.request_timeout_secs = 0;
        config.server.body_limit_bytes = 0;
        config.storage.audit_capacity = Some(0);
        config.logging.level = "loud".to_string();
        config.logging.format = "xml".to_string();
        config.cors.allowed_origins = vec!["https://ok.example".to_string(), "bad\norigin".to_string()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6, "{:?}", errors);
        assert!(errors.iter().any(|e| matches!(e, ConfigError::InvalidCorsOrigin(o) if o == "bad\norigin")));
    }
}
