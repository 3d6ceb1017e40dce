//! Typed configuration for Keel.
//!
//! - TOML and JSON files
//! - `.env` files via `dotenvy`
//! - Environment overrides (`KEEL__SECTION__KEY`)
//! - Strict parsing: unknown fields are errors
//!
//! # Configuration File Format
//!
//! ```toml
//! [versioning]
//! header = "x-api-version"
//! param = "version"
//!
//! [validation]
//! enabled = true
//!
//! [docs]
//! title = "Orders API"
//! version = "1.2.0"
//! servers = [{ url = "https://api.example.com" }]
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```

#![doc(html_root_url = "https://docs.rs/keel-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::KeelConfig;
pub use error::ConfigError;
pub use keel_telemetry::LogFormat;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{
    DocsConfig, DocsServer, LoggingConfig, ValidationConfig, VersioningConfig,
    DEFAULT_VERSION_HEADER, DEFAULT_VERSION_PARAM,
};
