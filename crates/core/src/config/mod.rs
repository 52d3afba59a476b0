//! Cache configuration with layered loading.
//!
//! Sources, highest precedence first:
//!
//! 1. Environment variables (SWRKV_*)
//! 2. TOML config file (explicit path, or SWRKV_CONFIG_FILE)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "SWRKV_";

/// Environment variable naming a TOML config file.
pub const CONFIG_FILE_ENV: &str = "SWRKV_CONFIG_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database.
    ///
    /// Set via SWRKV_DB_PATH.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Namespace cached records are partitioned under.
    ///
    /// Set via SWRKV_NAMESPACE.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Trace cache hits, misses and swallowed storage failures.
    ///
    /// Set via SWRKV_DEBUG_MODE.
    #[serde(default)]
    pub debug_mode: bool,

    /// How long SQLite waits on a locked database, in milliseconds.
    ///
    /// Set via SWRKV_BUSY_TIMEOUT_MS.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./swrkv-cache.sqlite")
}

fn default_namespace() -> String {
    "default".into()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            namespace: default_namespace(),
            debug_mode: false,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl AppConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Load configuration, reading the TOML file named by `SWRKV_CONFIG_FILE` if set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or if
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
        Self::load_with_file(config_file.as_deref())
    }

    /// Load configuration from `config_file` (if any), the environment and defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or if
    /// validation fails.
    pub fn load_with_file(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
