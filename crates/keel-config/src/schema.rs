//! Configuration section types.

use keel_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Default header carrying the requested handler version.
pub const DEFAULT_VERSION_HEADER: &str = "x-api-version";

/// Default request parameter carrying the requested handler version.
pub const DEFAULT_VERSION_PARAM: &str = "version";

/// Where the version hint is read from.
///
/// ```
/// use keel_config::VersioningConfig;
///
/// let config = VersioningConfig::default();
/// assert_eq!(config.header, "x-api-version");
/// assert_eq!(config.param, "version");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VersioningConfig {
    /// Header name (matched case-insensitively).
    #[serde(default = "default_version_header")]
    pub header: String,

    /// Request parameter name.
    #[serde(default = "default_version_param")]
    pub param: String,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            header: default_version_header(),
            param: default_version_param(),
        }
    }
}

fn default_version_header() -> String {
    DEFAULT_VERSION_HEADER.to_string()
}

fn default_version_param() -> String {
    DEFAULT_VERSION_PARAM.to_string()
}

/// Schema validation stage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// When false the validation stage is skipped for every descriptor.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// A server entry in generated documentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsServer {
    /// Server URL.
    pub url: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// OpenAPI document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// `info.title`.
    #[serde(default = "default_docs_title")]
    pub title: String,

    /// `info.version`.
    #[serde(default = "default_docs_version")]
    pub version: String,

    /// `info.description`.
    #[serde(default)]
    pub description: Option<String>,

    /// `servers`.
    #[serde(default)]
    pub servers: Vec<DocsServer>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: default_docs_title(),
            version: default_docs_version(),
            description: None,
            servers: Vec::new(),
        }
    }
}

fn default_docs_title() -> String {
    "Keel API".to_string()
}

fn default_docs_version() -> String {
    "0.1.0".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Whether logging is installed at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

impl LoggingConfig {
    /// Converts to the telemetry crate's config, starting from the preset
    /// matching the format.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        let base = match self.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            ..base
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
