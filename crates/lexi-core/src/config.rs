//! Lexi Configuration Management
//!
//! Handles configuration from environment variables and config files,
//! with defaults matching the standard extraction thresholds.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Extraction pipeline tuning
    pub extractor: ExtractorConfig,

    /// Dictionary source configuration
    pub dictionary: DictionaryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Extractor
        if let Ok(value) = std::env::var("LEXI_PROXIMITY_THRESHOLD") {
            config.extractor.proximity_threshold = parse_env("LEXI_PROXIMITY_THRESHOLD", value)?;
        }
        if let Ok(value) = std::env::var("LEXI_CONTEXT_WINDOW") {
            config.extractor.context_window = parse_env("LEXI_CONTEXT_WINDOW", value)?;
        }

        // Dictionary
        if let Ok(dir) = std::env::var("LEXI_DICTIONARY_DIR") {
            config.dictionary.directory = Some(PathBuf::from(dir));
        }
        if let Ok(domain) = std::env::var("LEXI_DEFAULT_DOMAIN") {
            config.dictionary.default_domain = domain;
        }

        // Logging
        if let Ok(level) = std::env::var("LEXI_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.extractor.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;

        config.extractor.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let defaults = Self::default();

        // Only override if env values differ from defaults
        if env_config.extractor.proximity_threshold != defaults.extractor.proximity_threshold {
            self.extractor.proximity_threshold = env_config.extractor.proximity_threshold;
        }
        if env_config.extractor.context_window != defaults.extractor.context_window {
            self.extractor.context_window = env_config.extractor.context_window;
        }
        if env_config.dictionary.directory.is_some() {
            self.dictionary.directory = env_config.dictionary.directory;
        }
        if env_config.dictionary.default_domain != defaults.dictionary.default_domain {
            self.dictionary.default_domain = env_config.dictionary.default_domain;
        }
        if env_config.logging.level != defaults.logging.level {
            self.logging.level = env_config.logging.level;
        }

        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Extraction pipeline tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum offset distance (exclusive) for two mentions to co-occur
    pub proximity_threshold: usize,

    /// Characters of context taken before and after a match
    pub context_window: usize,

    /// Windows at most this long are candidates for dot-leader noise
    pub toc_max_window_len: usize,

    /// Consecutive periods that make a dot leader
    pub dot_leader_run: usize,

    /// Signal count needed for prerequisite/contrast/example
    pub min_signal_count: usize,

    /// Divisor turning co-occurrence count into `related` strength
    pub related_strength_divisor: f32,

    /// Divisor turning signal count into prerequisite/contrast strength
    pub signal_strength_divisor: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 500,
            context_window: 100,
            toc_max_window_len: 30,
            dot_leader_run: 8,
            min_signal_count: 2,
            related_strength_divisor: 5.0,
            signal_strength_divisor: 3.0,
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("proximity_threshold", self.proximity_threshold),
            ("dot_leader_run", self.dot_leader_run),
            ("min_signal_count", self.min_signal_count),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        let divisors = [
            ("related_strength_divisor", self.related_strength_divisor),
            ("signal_strength_divisor", self.signal_strength_divisor),
        ];
        for (key, value) in divisors {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Dictionary source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Directory of JSON/TOML dictionaries; built-ins are used when unset
    pub directory: Option<PathBuf>,

    /// Domain used when the caller names none
    pub default_domain: String,

    /// Whether cross-domain concepts are included by default
    pub include_cross_domain: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            directory: None,
            default_domain: "computing".to_string(),
            include_cross_domain: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.extractor.proximity_threshold, 500);
        assert_eq!(config.extractor.context_window, 100);
        assert_eq!(config.dictionary.default_domain, "computing");
        assert!(config.extractor.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let config = ExtractorConfig {
            proximity_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let config = ExtractorConfig {
            signal_strength_divisor: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[extractor]\nproximity_threshold = 250\n\n[logging]\njson_format = true"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.extractor.proximity_threshold, 250);
        assert_eq!(config.extractor.context_window, 100);
        assert!(config.logging.json_format);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file_missing() {
        let result = AppConfig::from_file("/nonexistent/lexi.toml");
        assert!(matches!(result, Err(ConfigError::FileReadError { .. })));
    }
}
