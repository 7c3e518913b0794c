//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the kilo-hoku.toml file.
//! It covers the planisphere defaults (starting angle, modal close policy, simulated
//! widget size) and the default log filter.

use crate::planisphere::ModalClosePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "kilo-hoku.toml";

/// Log filter used when the config does not set one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Errors raised while reading, validating or writing the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for [`Config`]
    #[error("invalid config format: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized back to TOML
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Parsed fine but a value is out of range
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Application configuration loaded from kilo-hoku.toml
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Config {
    /// Planisphere wheel settings
    #[serde(default)]
    pub planisphere: PlanisphereConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Planisphere wheel configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanisphereConfig {
    /// Angle the inline wheel starts at, in degrees (0 = Jan, 00:00)
    pub initial_angle_degrees: f64,
    /// Whether closing the modal wheel keeps ("commit") or drops ("discard") its angle
    pub modal_close_policy: ModalClosePolicy,
    /// Side of the square widget the CLI simulates drags over, in pixels
    pub widget_size_px: f64,
}

impl Default for PlanisphereConfig {
    fn default() -> Self {
        PlanisphereConfig {
            initial_angle_degrees: 0.0,
            modal_close_policy: ModalClosePolicy::Discard,
            widget_size_px: 320.0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no -v flag and no RUST_LOG is given
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from kilo-hoku.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::or_default(Self::try_load_from_path(path), path)
    }

    /// Unwrap a load result, logging why the defaults are used when it failed
    pub fn or_default(loaded: Result<Self, ConfigError>, path: &Path) -> Self {
        match loaded {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                config
            }
            Err(ConfigError::Io(_)) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unusable config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate configuration, reporting every failure to the caller
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the planisphere cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.planisphere;
        if !p.initial_angle_degrees.is_finite() {
            return Err(ConfigError::Invalid {
                field: "planisphere.initial_angle_degrees",
                reason: format!("{} is not a finite angle", p.initial_angle_degrees),
            });
        }
        if !(p.widget_size_px.is_finite() && p.widget_size_px > 0.0) {
            return Err(ConfigError::Invalid {
                field: "planisphere.widget_size_px",
                reason: format!("{} must be a positive size", p.widget_size_px),
            });
        }
        Ok(())
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.planisphere.initial_angle_degrees, 0.0);
        assert_eq!(
            config.planisphere.modal_close_policy,
            ModalClosePolicy::Discard
        );
        assert_eq!(config.planisphere.widget_size_px, 320.0);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.planisphere.modal_close_policy = ModalClosePolicy::Commit;
        config.planisphere.initial_angle_degrees = -45.5;

        let file = NamedTempFile::new().unwrap();
        config.save_to_path(file.path()).unwrap();
        let parsed = Config::try_load_from_path(file.path()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = write_config("[planisphere]\nmodal_close_policy = \"commit\"\n");
        let config = Config::try_load_from_path(file.path()).unwrap();
        assert_eq!(
            config.planisphere.modal_close_policy,
            ModalClosePolicy::Commit
        );
        assert_eq!(config.planisphere.widget_size_px, 320.0);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
        assert!(matches!(
            Config::try_load_from_path("/nonexistent/path"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let file = write_config("[planisphere\n");
        assert!(matches!(
            Config::try_load_from_path(file.path()),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let file = write_config("[planisphere]\nmodal_close_policy = \"merge\"\n");
        assert!(matches!(
            Config::try_load_from_path(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_non_positive_widget_is_invalid() {
        let file = write_config("[planisphere]\nwidget_size_px = 0.0\n");
        let err = Config::try_load_from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "planisphere.widget_size_px",
                ..
            }
        ));
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_infinite_angle_is_invalid() {
        let file = write_config("[planisphere]\ninitial_angle_degrees = inf\n");
        assert!(matches!(
            Config::try_load_from_path(file.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
