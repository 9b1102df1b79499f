//! Routing error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Invalid route pattern: {0}")]
    InvalidPattern(String),

    /// The path contained a `%` not followed by two hex digits, or
    /// percent-encoded bytes that do not form valid UTF-8. Paths are
    /// attacker-controlled, so this propagates instead of silently passing
    /// the raw path through.
    #[error("Malformed percent-encoding in path: {path}")]
    Decode {
        path: String,
        #[source]
        source: Option<std::str::Utf8Error>,
    },
}
