//! Keel route matching
//!
//! Decides whether a URL belongs to the app (same origin, inside the
//! configured base prefix) and resolves it into the ordered set of route
//! definitions whose pattern matches the decoded path.

mod error;
mod matcher;
mod pattern;
mod route;

pub use error::RoutingError;
pub use matcher::{NavigationInfo, RouteMatcher};
pub use pattern::{PathPattern, RoutePattern};
pub use route::{RouteDefinition, RouteMetadata};

pub type Result<T> = std::result::Result<T, RoutingError>;
