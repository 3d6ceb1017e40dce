//! Endpoint kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a descriptor's identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    /// HTTP route; identifier is `"METHOD /path"` or `"/path"`.
    Route,
    /// Event consumer; identifier is the event name.
    Event,
    /// Scheduled job; identifier is a cron expression.
    Cron,
    /// Background task; identifier is the task name.
    Task,
}

impl HandlerKind {
    /// Returns the lowercase kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Event => "event",
            Self::Cron => "cron",
            Self::Task => "task",
        }
    }

    /// Returns all kinds.
    #[must_use]
    pub const fn all() -> &'static [HandlerKind] {
        &[Self::Route, Self::Event, Self::Cron, Self::Task]
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
