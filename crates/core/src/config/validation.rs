//! Configuration validation rules.

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound on the SQLite busy timeout, in milliseconds.
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `namespace` is empty
    /// - `db_path` is empty
    /// - `busy_timeout_ms` exceeds one minute
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "namespace".into(), reason: "must not be empty".into() });
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_path".into(), reason: "must not be empty".into() });
        }

        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid {
                field: "busy_timeout_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.busy_timeout_ms == 0 {
            tracing::warn!("busy_timeout_ms is 0; concurrent writers will fail immediately on a locked database");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_namespace() {
        for namespace in ["", "   "] {
            let config = AppConfig { namespace: namespace.into(), ..Default::default() };
            let result = config.validate();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "namespace"));
        }
    }

    #[test]
    fn test_validate_empty_db_path() {
        let config = AppConfig { db_path: PathBuf::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "db_path"));
    }

    #[test]
    fn test_validate_busy_timeout_exceeds_limit() {
        let config = AppConfig { busy_timeout_ms: 60_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "busy_timeout_ms"));
    }

    #[test]
    fn test_validate_edge_values() {
        let config = AppConfig { busy_timeout_ms: 0, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { busy_timeout_ms: 60_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::Invalid { field: "namespace".into(), reason: "must not be empty".into() };
        assert_eq!(err.to_string(), "invalid configuration: namespace - must not be empty");
    }
}
