//! Tool configuration file
//!
//! JSON file, every field optional:
//!
//! ```json
//! { "catalog_path": "./stages.json", "max_depth": 32, "max_array_len": 4096, "log_level": "info" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::schema::ValidationLimits;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Catalog definition file; the built-in catalog when unset
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Maximum schema nesting depth walked (default 32)
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum array length validated (default 4096)
    #[serde(default = "default_max_array_len")]
    pub max_array_len: usize,

    /// Lowest log severity written (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_depth() -> usize {
    ValidationLimits::default().max_depth
}
fn default_max_array_len() -> usize {
    ValidationLimits::default().max_array_len
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            max_depth: default_max_depth(),
            max_array_len: default_max_array_len(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.max_depth == 0 {
            return Err(CliError::config_error("max_depth must be > 0"));
        }

        if self.max_array_len == 0 {
            return Err(CliError::config_error("max_array_len must be > 0"));
        }

        self.severity()?;

        Ok(())
    }

    pub fn limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_depth: self.max_depth,
            max_array_len: self.max_array_len,
        }
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(CliError::config_error)
    }

    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog_path.as_ref().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(temp_dir: &TempDir, value: serde_json::Value) -> PathBuf {
        let path = temp_dir.path().join("stageschema.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({}));

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.limits(), ValidationLimits::default());
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert!(config.catalog_path().is_none());
    }

    #[test]
    fn test_config_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            json!({ "catalog_path": "/etc/stages.json", "max_depth": 4, "log_level": "warn" }),
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.limits().max_depth, 4);
        assert_eq!(config.limits().max_array_len, 4096);
        assert_eq!(config.severity().unwrap(), Severity::Warn);
        assert_eq!(config.catalog_path(), Some(PathBuf::from("/etc/stages.json")));
    }

    #[test]
    fn test_config_rejects_zero_limits() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "max_array_len": 0 }));

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_rejects_unknown_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "log_level": "chatty" }));

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({ "max_dept": 4 }));

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load(&temp_dir.path().join("absent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
