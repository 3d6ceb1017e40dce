//! # Keel Telemetry
//!
//! Structured logging for Keel services.
//!
//! Keel crates log through `tracing` macros. This crate installs the
//! subscriber that renders them, as JSON for production or pretty-printed
//! for development, and names the fields the pipeline attaches to its
//! events (see [`logging::fields`]).
//!
//! ```rust,ignore
//! use keel_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!("ready");
//! ```

#![doc(html_root_url = "https://docs.rs/keel-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};
