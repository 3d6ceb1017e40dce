//! String format checks (`email`, `uuid`, `uri`).

use regex::Regex;
use std::sync::OnceLock;
use url::Url;
use uuid::Uuid;

/// A recognized `format` keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringFormat {
    /// `local@domain.tld`
    Email,
    /// Hyphenated 8-4-4-4-12 UUID.
    Uuid,
    /// Absolute URI with a scheme.
    Uri,
}

impl StringFormat {
    /// Parses a `format` keyword. Unknown formats return `None` and are ignored.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "email" => Some(Self::Email),
            "uuid" => Some(Self::Uuid),
            "uri" | "url" => Some(Self::Uri),
            _ => None,
        }
    }

    /// Returns the keyword spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::Uri => "uri",
        }
    }

    /// Checks a string against this format.
    #[must_use]
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::Email => email_regex().is_match(value),
            Self::Uuid => value.len() == 36 && Uuid::try_parse(value).is_ok(),
            Self::Uri => is_uri(value),
        }
    }

    pub(crate) fn failure_message(self) -> &'static str {
        match self {
            Self::Email => "invalid email address",
            Self::Uuid => "invalid uuid",
            Self::Uri => "invalid uri",
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Absolute URL per the WHATWG parser. Special schemes need a host.
fn is_uri(value: &str) -> bool {
    !value.is_empty() && !value.contains(char::is_whitespace) && Url::parse(value).is_ok()
}
