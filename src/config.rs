//! Configuration management for the token bucket limiter and its driver.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Result, TokenBucketError};
use crate::ratelimit::TimeUnit;

/// Main configuration, as read from a YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenBucketConfig {
    /// Limiter configuration
    #[serde(default)]
    pub limiter: LimiterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of a single limiter.
///
/// The refill rate is expressed as `requests_per_unit` per `unit`, the way
/// rate limits are usually written down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Number of events allowed per unit of time
    #[serde(default = "default_requests_per_unit")]
    pub requests_per_unit: f64,

    /// The time unit
    #[serde(default)]
    pub unit: TimeUnit,

    /// Maximum token balance
    #[serde(default = "default_burst")]
    pub burst: f64,

    /// Starting balance; a full bucket when not set
    #[serde(default)]
    pub initial_tokens: Option<f64>,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_unit: default_requests_per_unit(),
            unit: TimeUnit::default(),
            burst: default_burst(),
            initial_tokens: None,
        }
    }
}

impl LimiterConfig {
    /// Refill rate in events per second.
    pub fn rate(&self) -> f64 {
        self.unit.per_second(self.requests_per_unit)
    }
}

fn default_requests_per_unit() -> f64 {
    10.0
}

fn default_burst() -> f64 {
    1.0
}

/// Logging configuration for the driver binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `tokenbucket=trace`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TokenBucketConfig {
    /// Load configuration from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading limiter configuration");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| TokenBucketError::Config(format!("Failed to parse limiter config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TokenBucketConfig::default();
        assert_eq!(config.limiter.rate(), 10.0);
        assert_eq!(config.limiter.burst, 1.0);
        assert_eq!(config.limiter.initial_tokens, None);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
limiter:
  requests_per_unit: 600
  unit: minute
  burst: 20
  initial_tokens: 5
logging:
  level: debug
  json: true
"#;
        let config = TokenBucketConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.limiter.unit, TimeUnit::Minute);
        assert_eq!(config.limiter.rate(), 10.0);
        assert_eq!(config.limiter.burst, 20.0);
        assert_eq!(config.limiter.initial_tokens, Some(5.0));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let yaml = r#"
limiter:
  burst: 3
"#;
        let config = TokenBucketConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.limiter.requests_per_unit, 10.0);
        assert_eq!(config.limiter.unit, TimeUnit::Second);
        assert_eq!(config.limiter.burst, 3.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_invalid_config() {
        let yaml = "limiter:\n  unit: fortnight\n";
        let result = TokenBucketConfig::from_yaml(yaml);
        assert!(matches!(result, Err(TokenBucketError::Config(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let result = TokenBucketConfig::from_file("/nonexistent/tokenbucket.yaml");
        assert!(matches!(result, Err(TokenBucketError::Io(_))));
    }
}
