//! Route identifiers.
//!
//! A route identifier is `"METHOD /path"` or just `"/path"` (meaning `GET`).
//! Path parameters are written `:name` or `{name}`.

use http::Method;
use std::fmt;

/// A parsed route identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteTarget {
    method: Method,
    path: String,
}

impl RouteTarget {
    /// Parses a route identifier.
    ///
    /// Returns a reason string on failure; finalization wraps it into a
    /// configuration error naming the descriptor.
    ///
    /// ```
    /// use keel_handler::RouteTarget;
    ///
    /// let target = RouteTarget::parse("post /users/:id").unwrap();
    /// assert_eq!(target.method(), &http::Method::POST);
    /// assert_eq!(target.openapi_path(), "/users/{id}");
    /// ```
    pub fn parse(identifier: &str) -> Result<Self, String> {
        let identifier = identifier.trim();
        let (method, path) = match identifier.split_once(char::is_whitespace) {
            Some((method, path)) => {
                let method = parse_method(method)
                    .ok_or_else(|| format!("unsupported HTTP method `{method}`"))?;
                (method, path.trim())
            }
            None => (Method::GET, identifier),
        };

        if !path.starts_with('/') {
            return Err(format!("route path `{path}` must start with `/`"));
        }
        if path.contains(char::is_whitespace) {
            return Err(format!("route path `{path}` must not contain whitespace"));
        }

        Ok(Self {
            method,
            path: path.to_string(),
        })
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path as declared.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Names of the path parameters, in order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.path.split('/').filter_map(segment_param).collect()
    }

    /// The path with every parameter in `{name}` form.
    #[must_use]
    pub fn openapi_path(&self) -> String {
        self.path
            .split('/')
            .map(|segment| match segment_param(segment) {
                Some(name) => format!("{{{name}}}"),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

fn parse_method(name: &str) -> Option<Method> {
    match name.to_ascii_uppercase().as_str() {
        "GET" => Some(Method::GET),
        "POST" => Some(Method::POST),
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        "HEAD" => Some(Method::HEAD),
        "OPTIONS" => Some(Method::OPTIONS),
        _ => None,
    }
}

fn segment_param(segment: &str) -> Option<&str> {
    segment
        .strip_prefix(':')
        .or_else(|| segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
        .filter(|name| !name.is_empty())
}
