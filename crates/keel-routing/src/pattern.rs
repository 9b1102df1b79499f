//! Route patterns
//!
//! A pattern is a predicate over normalized path strings. The route table
//! stores patterns behind a trait so embedders can plug in their own
//! matching scheme; [`PathPattern`] covers the common `/posts/:id` and
//! `/files/*` shapes.

use crate::error::RoutingError;
use crate::Result;

/// Membership check over a normalized path string.
pub trait RoutePattern: Send + Sync + std::fmt::Debug {
    fn test(&self, path: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Exact segment text
    Literal(String),
    /// `:name` - any single non-empty segment
    Param(String),
    /// `*` - the remaining suffix, possibly empty; only valid last
    Wildcard,
}

/// Segment-based path pattern: literals, `:param` placeholders and a
/// trailing `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(spec: &str) -> Result<Self> {
        if !spec.starts_with('/') {
            return Err(RoutingError::InvalidPattern(spec.to_string()));
        }

        let mut segments = Vec::new();
        for part in spec.split('/').filter(|p| !p.is_empty()) {
            if matches!(segments.last(), Some(Segment::Wildcard)) {
                // nothing may follow a wildcard
                return Err(RoutingError::InvalidPattern(spec.to_string()));
            }

            let segment = if part == "*" {
                Segment::Wildcard
            } else if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(RoutingError::InvalidPattern(spec.to_string()));
                }
                Segment::Param(name.to_string())
            } else {
                Segment::Literal(part.to_string())
            };

            segments.push(segment);
        }

        Ok(Self {
            raw: spec.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl RoutePattern for PathPattern {
    fn test(&self, path: &str) -> bool {
        // A single trailing slash is insignificant, so paths normalized
        // under the `always` trailing-slash policy still match.
        let path = if path != "/" {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };

        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let mut segments = self.segments.iter();

        loop {
            match (segments.next(), parts.next()) {
                (Some(Segment::Wildcard), _) => return true,
                (Some(Segment::Literal(lit)), Some(part)) if lit.as_str() == part => {}
                (Some(Segment::Param(_)), Some(part)) if !part.is_empty() => {}
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
