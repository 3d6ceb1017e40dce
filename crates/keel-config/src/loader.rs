//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{ConfigError, KeelConfig};

/// Default environment prefix.
pub const DEFAULT_ENV_PREFIX: &str = "KEEL";

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Defaults (or a preset)
/// 2. Configuration file or string (TOML or JSON)
/// 3. `.env` file, loaded into the process environment
/// 4. Environment variables `PREFIX__SECTION__KEY`
///
/// The result is validated before it is returned.
///
/// ```no_run
/// use keel_config::ConfigLoader;
///
/// # fn main() -> Result<(), keel_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("keel.toml")?
///     .with_dotenv()?
///     .with_env_prefix("KEEL")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: KeelConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from [`KeelConfig::development`].
    ///
    /// ```
    /// use keel_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = KeelConfig::development();
        self
    }

    /// Start from [`KeelConfig::production`].
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = KeelConfig::production();
        self
    }

    /// Load a file; the format follows the extension (`.toml` or `.json`).
    ///
    /// Only the keys present in the file override the current values, so a
    /// file applied over a preset keeps the preset's other settings.
    /// Unknown fields are rejected.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        let layer = match extension.as_deref() {
            Some("toml") => parse_toml(&content)?,
            Some("json") => parse_json(&content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat(
                    path.display().to_string(),
                ))
            }
        };

        self.merge_layer(layer)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `"toml"` or `"json"` format.
    ///
    /// ```
    /// use keel_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[validation]\nenabled = false", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    /// assert!(!config.validation.enabled);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let layer = match format.to_lowercase().as_str() {
            "toml" => parse_toml(content)?,
            "json" => parse_json(content)?,
            _ => return Err(ConfigError::UnsupportedFormat(format.to_string())),
        };
        self.merge_layer(layer)?;
        Ok(self)
    }

    /// Load `.env` from the current directory or its parents, if present.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Load a specific `.env`-style file. Variables already set win.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Enable environment overrides, e.g. `KEEL__VERSIONING__HEADER`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Apply environment overrides, then validate.
    pub fn load(mut self) -> Result<KeelConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let marker = format!("{prefix}__");
            let mut vars: Vec<(String, String)> =
                env::vars().filter(|(k, _)| k.starts_with(&marker)).collect();
            vars.sort();
            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Return the configuration without env overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> KeelConfig {
        self.config
    }

    /// Overlays the keys present in `layer` onto the current configuration.
    fn merge_layer(&mut self, layer: Value) -> Result<(), ConfigError> {
        let mut merged = serde_json::to_value(&self.config)?;
        overlay(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let rest = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = rest.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["VERSIONING", "HEADER"] => config.versioning.header = value.to_ascii_lowercase(),
            ["VERSIONING", "PARAM"] => config.versioning.param = value.to_string(),

            ["VALIDATION", "ENABLED"] => {
                config.validation.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            ["DOCS", "TITLE"] => config.docs.title = value.to_string(),
            ["DOCS", "VERSION"] => config.docs.version = value.to_string(),
            ["DOCS", "DESCRIPTION"] => {
                config.docs.description = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }

            ["LOGGING", "ENABLED"] => {
                config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = value
                    .parse()
                    .map_err(|reason: String| ConfigError::env_parse_error(key, reason))?;
            }

            _ => {
                return Err(ConfigError::UnknownKey {
                    var: key.to_string(),
                })
            }
        }

        Ok(())
    }
}

/// Parses a TOML layer. The strict parse reports unknown fields against
/// the source format before the raw table is kept for merging.
fn parse_toml(content: &str) -> Result<Value, ConfigError> {
    toml::from_str::<KeelConfig>(content)?;
    let table: toml::Table = toml::from_str(content)?;
    Ok(serde_json::to_value(table)?)
}

fn parse_json(content: &str) -> Result<Value, ConfigError> {
    serde_json::from_str::<KeelConfig>(content)?;
    Ok(serde_json::from_str(content)?)
}

/// Objects merge key by key; any other value replaces the target.
fn overlay(target: &mut Value, layer: Value) {
    match (target, layer) {
        (Value::Object(target), Value::Object(layer)) => {
            for (key, value) in layer {
                match target.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, layer) => *target = layer,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
