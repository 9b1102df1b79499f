//! Router configuration

use serde::{Deserialize, Serialize};

/// Normalization rule applied to resolved paths before they are treated as
/// canonical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingSlash {
    /// Strip a trailing slash unless the path is exactly `/`.
    Never,
    /// Append a trailing slash unless the final segment looks like a
    /// filename (contains a `.`).
    Always,
    /// Leave paths unchanged.
    #[default]
    Ignore,
}

impl TrailingSlash {
    /// Normalize a path under this policy. Idempotent: applying it to an
    /// already-normalized path changes nothing.
    pub fn apply(&self, path: &str) -> String {
        match self {
            TrailingSlash::Never => {
                if path != "/" && path.ends_with('/') {
                    path[..path.len() - 1].to_string()
                } else {
                    path.to_string()
                }
            }
            TrailingSlash::Always => {
                let is_file = path
                    .rsplit('/')
                    .next()
                    .map(|segment| segment.contains('.'))
                    .unwrap_or(false);

                if !is_file && !path.ends_with('/') {
                    format!("{}/", path)
                } else {
                    path.to_string()
                }
            }
            TrailingSlash::Ignore => path.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrailingSlash::Never => "never",
            TrailingSlash::Always => "always",
            TrailingSlash::Ignore => "ignore",
        }
    }
}

impl std::fmt::Display for TrailingSlash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TrailingSlash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" => Ok(TrailingSlash::Never),
            "always" => Ok(TrailingSlash::Always),
            "ignore" => Ok(TrailingSlash::Ignore),
            _ => Err(format!("Unknown trailing-slash policy: {}", s)),
        }
    }
}

/// Router construction options. Routes and collaborators are passed to
/// [`crate::Router::new`] alongside this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Root-relative mount path of the app; empty for apps mounted at `/`.
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub trailing_slash: TrailingSlash,
}
