//! Session configuration, loadable from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::DEFAULT_TOLERANCE_DA;

/// Why a configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// File is not valid JSON for [`LookupConfig`].
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one lookup session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Consolidated compound file.
    pub database_path: PathBuf,
    /// Tolerance used when a mass query does not give one (Da).
    pub default_tolerance_da: f64,
    /// Cap on returned results, `None` for no cap.
    pub max_results: Option<usize>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("database/compounds.db"),
            default_tolerance_da: DEFAULT_TOLERANCE_DA,
            max_results: None,
        }
    }
}

impl LookupConfig {
    /// Reads and validates a JSON config file. Missing keys take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses and validates a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_tolerance_da.is_finite() || self.default_tolerance_da <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_tolerance_da must be > 0, got {}",
                self.default_tolerance_da
            )));
        }
        if self.max_results == Some(0) {
            return Err(ConfigError::Invalid("max_results must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let cfg = LookupConfig::from_json(r#"{ "max_results": 25 }"#).unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("database/compounds.db"));
        assert_eq!(cfg.default_tolerance_da, 0.5);
        assert_eq!(cfg.max_results, Some(25));
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        let err = LookupConfig::from_json(r#"{ "default_tolerance_da": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            LookupConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
