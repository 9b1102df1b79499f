//! Route definitions
//!
//! A route pairs a pattern with the metadata the render collaborator needs
//! to mount it. Definitions are created once at router construction from a
//! pre-built route table and never mutated.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::pattern::RoutePattern;

/// Metadata associated with one route: the module loader identity and the
/// layout chain wrapping it, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetadata {
    pub module: String,
    #[serde(default)]
    pub layouts: Vec<String>,
}

impl RouteMetadata {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            layouts: Vec::new(),
        }
    }

    pub fn with_layouts(module: impl Into<String>, layouts: Vec<String>) -> Self {
        Self {
            module: module.into(),
            layouts,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pattern: Arc<dyn RoutePattern>,
    metadata: RouteMetadata,
}

impl RouteDefinition {
    pub fn new(pattern: impl RoutePattern + 'static, metadata: RouteMetadata) -> Self {
        Self {
            pattern: Arc::new(pattern),
            metadata,
        }
    }

    /// Check whether this route applies to a normalized path.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.test(path)
    }

    pub fn metadata(&self) -> &RouteMetadata {
        &self.metadata
    }
}
