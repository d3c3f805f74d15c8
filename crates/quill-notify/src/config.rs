//! Tunables for the notification index, loadable from TOML.
//!
//! ```toml
//! seen_dwell_ms = 3000
//! scroll_threshold = 20.0
//! page_size = 3
//! archive_retention = 500
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SEEN_DWELL_MS: u64 = 3000;
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 20.0;
pub const DEFAULT_PAGE_SIZE: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    /// How long the inbox must stay visible before it counts as seen.
    pub seen_dwell_ms: u64,
    /// Remaining scroll distance below which another page is fetched.
    pub scroll_threshold: f64,
    /// Timeboxes requested per fetch.
    pub page_size: usize,
    /// Maximum archived timeboxes kept; `None` keeps everything.
    pub archive_retention: Option<usize>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            seen_dwell_ms: DEFAULT_SEEN_DWELL_MS,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            page_size: DEFAULT_PAGE_SIZE,
            archive_retention: None,
        }
    }
}

impl NotifyConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Self::parse_at(raw, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_at(&raw, &path.display().to_string())
    }

    fn parse_at(raw: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be positive".into()));
        }
        if self.scroll_threshold.is_nan() || self.scroll_threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "scroll_threshold must be a non-negative number".into(),
            ));
        }
        Ok(())
    }

    pub fn seen_dwell(&self) -> Duration {
        Duration::from_millis(self.seen_dwell_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = NotifyConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, NotifyConfig::default());
        assert_eq!(config.seen_dwell(), Duration::from_millis(3000));
        assert_eq!(config.page_size, 3);
        assert_eq!(config.archive_retention, None);
    }

    #[test]
    fn partial_toml_overrides_named_keys() {
        let config = NotifyConfig::from_toml_str("page_size = 10\narchive_retention = 2\n")
            .expect("valid config");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.archive_retention, Some(2));
        assert_eq!(config.seen_dwell_ms, DEFAULT_SEEN_DWELL_MS);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            NotifyConfig::from_toml_str("page_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            NotifyConfig::from_toml_str("scroll_threshold = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            NotifyConfig::from_toml_str("page_sise = 4"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = NotifyConfig::load("/definitely/not/here.toml").expect_err("missing file");
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
