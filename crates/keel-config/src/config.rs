//! The root configuration type.

use crate::error::ConfigError;
use crate::schema::{DocsConfig, LoggingConfig, ValidationConfig, VersioningConfig};
use keel_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

/// Complete Keel configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and the
/// environment.
///
/// ```
/// use keel_config::KeelConfig;
///
/// let config = KeelConfig::default();
/// assert!(config.validation.enabled);
/// assert_eq!(config.versioning.header, "x-api-version");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct KeelConfig {
    /// Version negotiation.
    #[serde(default)]
    pub versioning: VersioningConfig,

    /// Validation stage.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Generated documentation.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KeelConfig {
    /// Pretty logs at debug level.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config
    }

    /// JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let header = self.versioning.header.trim();
        if header.is_empty() {
            return Err(ConfigError::invalid_value(
                "versioning.header",
                "must not be empty",
            ));
        }
        if http::HeaderName::from_bytes(header.as_bytes()).is_err() {
            return Err(ConfigError::invalid_value(
                "versioning.header",
                format!("`{header}` is not a valid header name"),
            ));
        }
        if self.versioning.param.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "versioning.param",
                "must not be empty",
            ));
        }

        if self.docs.title.trim().is_empty() {
            return Err(ConfigError::invalid_value("docs.title", "must not be empty"));
        }
        if self.docs.version.trim().is_empty() {
            return Err(ConfigError::invalid_value("docs.version", "must not be empty"));
        }
        if let Some(server) = self.docs.servers.iter().find(|s| s.url.trim().is_empty()) {
            return Err(ConfigError::invalid_value(
                "docs.servers",
                format!("server url must not be empty ({server:?})"),
            ));
        }

        if self.logging.enabled {
            keel_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DocsServer;

    #[test]
    fn test_default_is_valid() {
        assert!(KeelConfig::default().validate().is_ok());
        assert!(KeelConfig::development().validate().is_ok());
        assert!(KeelConfig::production().validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = KeelConfig::development();
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert_eq!(dev.logging.level, "debug");
        assert_eq!(KeelConfig::production().logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_header_name() {
        let mut config = KeelConfig::default();
        config.versioning.header = "bad header".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "versioning.header"));
    }

    #[test]
    fn test_empty_param() {
        let mut config = KeelConfig::default();
        config.versioning.param = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_server_url() {
        let mut config = KeelConfig::default();
        config.docs.servers.push(DocsServer {
            url: String::new(),
            description: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_log_level_only_checked_when_enabled() {
        let mut config = KeelConfig::default();
        config.logging.level = "keel=loud".to_string();
        assert!(config.validate().is_err());
        config.logging.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<KeelConfig, _> = toml::from_str("[server]\nport = 1");
        assert!(result.is_err());
    }
}
