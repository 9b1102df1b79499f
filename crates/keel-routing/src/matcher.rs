//! URL ownership and resolution
//!
//! The matcher decides whether a URL is inside the app's routing scope and,
//! if so, produces a [`NavigationInfo`] for the render collaborator. It has
//! no side effects; one `NavigationInfo` is created per navigation or
//! prefetch attempt and discarded once the collaborator returns.

use url::{Origin, Url};

use crate::error::RoutingError;
use crate::route::RouteDefinition;
use crate::Result;

/// Escapes for these characters stay encoded during path decoding, so an
/// encoded `/` (or other delimiter) cannot change the path's segment
/// structure before route matching.
const RESERVED: &[u8] = b"#$&+,/:;=?@";

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|v| v as u8)
}

/// Percent-decode a path, leaving reserved-character escapes intact. A `%`
/// not followed by two hex digits is a hard error, as is a decoded byte
/// sequence that is not valid UTF-8.
fn decode_path(rest: &str, full_path: &str) -> Result<String> {
    let bytes = rest.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = (
                bytes.get(i + 1).copied().and_then(hex_value),
                bytes.get(i + 2).copied().and_then(hex_value),
            );
            let (hi, lo) = match hex {
                (Some(hi), Some(lo)) => (hi, lo),
                _ => {
                    return Err(RoutingError::Decode {
                        path: full_path.to_string(),
                        source: None,
                    });
                }
            };

            let byte = hi << 4 | lo;
            if RESERVED.contains(&byte) {
                out.extend_from_slice(&bytes[i..i + 3]);
            } else {
                out.push(byte);
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|err| RoutingError::Decode {
        path: full_path.to_string(),
        source: Some(err.utf8_error()),
    })
}

/// Resolved navigation target, consumed by the render collaborator.
#[derive(Debug, Clone)]
pub struct NavigationInfo {
    /// Dedupe/cache key: path plus query.
    pub id: String,
    /// Matching routes, in original registration order.
    pub routes: Vec<RouteDefinition>,
    pub url: Url,
    /// Decoded pathname relative to the base prefix.
    pub path: String,
}

pub struct RouteMatcher {
    origin: Origin,
    base: String,
    routes: Vec<RouteDefinition>,
}

impl RouteMatcher {
    /// `origin_url` is the document the app is running in; only URLs on the
    /// same origin can be owned.
    pub fn new(origin_url: &Url, base: impl Into<String>, routes: Vec<RouteDefinition>) -> Self {
        Self {
            origin: origin_url.origin(),
            base: base.into(),
            routes,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    /// True iff the URL's origin equals the document origin and its path
    /// starts with the configured base prefix.
    pub fn owns(&self, url: &Url) -> bool {
        url.origin() == self.origin && url.path().starts_with(&self.base)
    }

    /// Resolve a URL into a [`NavigationInfo`], or `None` if the URL is not
    /// owned by this app. Malformed percent-encoding in the path is a hard
    /// error, never silently passed through; reserved-character escapes
    /// stay encoded.
    pub fn resolve(&self, url: &Url) -> Result<Option<NavigationInfo>> {
        if !self.owns(url) {
            return Ok(None);
        }

        let rest = &url.path()[self.base.len()..];
        let decoded = decode_path(rest, url.path())?;

        let path = if decoded.is_empty() {
            "/".to_string()
        } else {
            decoded
        };

        let routes: Vec<RouteDefinition> = self
            .routes
            .iter()
            .filter(|route| route.matches(&path))
            .cloned()
            .collect();

        let id = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        tracing::trace!(%url, path = %path, matched = routes.len(), "resolved URL");

        Ok(Some(NavigationInfo {
            id,
            routes,
            url: url.clone(),
            path,
        }))
    }
}
