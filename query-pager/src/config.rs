//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `QUERY_PAGER_`, `__` between nesting levels)
//! 2. A TOML file: `./query-pager.toml`, or the path given to [`Config::load_from`]
//! 3. Default values
//!
//! ```toml
//! [pager]
//! max_results_size = 50
//! enable_total_count = false
//!
//! [logging]
//! level = "query_pager=debug"
//! json = false
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "query-pager.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "QUERY_PAGER_";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Pager behaviour
    #[serde(default)]
    pub pager: PagerConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Largest `first` / `last` / `limit` accepted; larger requests are rejected
    #[serde(default = "default_max_results_size")]
    pub max_results_size: Option<u64>,

    /// Whether connections may run the count query behind `totalCount`
    #[serde(default = "default_true")]
    pub enable_total_count: bool,

    /// Whether entities with keyset fields use keyset cursors
    #[serde(default = "default_true")]
    pub keyset: bool,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            max_results_size: default_max_results_size(),
            enable_total_count: true,
            keyset: true,
        }
    }
}

impl PagerConfig {
    /// No page size limit
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.max_results_size = None;
        self
    }

    /// Set the page size limit
    #[must_use]
    pub fn with_max_results_size(mut self, max: u64) -> Self {
        self.max_results_size = Some(max);
        self
    }

    /// Never run count queries
    #[must_use]
    pub fn without_total_count(mut self) -> Self {
        self.enable_total_count = false;
        self
    }

    /// Force limit/offset cursors for every entity
    #[must_use]
    pub fn without_keyset(mut self) -> Self {
        self.keyset = false;
        self
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives (trace, debug, info, warn, error, or per-target)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default = "default_true")]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: true,
        }
    }
}

fn default_max_results_size() -> Option<u64> {
    Some(100)
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `./query-pager.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
        } else {
            tracing::debug!("No {} found, using defaults and environment", DEFAULT_CONFIG_FILE);
        }
        Self::load_from(path)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::figment(path.as_ref()).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Load from config file (if exists)
            .merge(Toml::file(path))
            // Override with environment variables
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pager.max_results_size, Some(100));
        assert!(config.pager.enable_total_count);
        assert!(config.pager.keyset);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.pager, PagerConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[pager]
max_results_size = 25
enable_total_count = false

[logging]
level = "debug"
json = false
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.pager.max_results_size, Some(25));
        assert!(!config.pager.enable_total_count);
        assert!(config.pager.keyset);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pager]\nmax_results_size = \"lots\"").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_pager_config_builders() {
        let config = PagerConfig::default()
            .with_max_results_size(10)
            .without_total_count()
            .without_keyset();
        assert_eq!(config.max_results_size, Some(10));
        assert!(!config.enable_total_count);
        assert!(!config.keyset);
        assert_eq!(config.unbounded().max_results_size, None);
    }
}
