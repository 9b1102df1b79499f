//! Scroll memory types

use serde::{Deserialize, Serialize};

/// Snapshot of viewport scroll offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Browser scroll-restoration mode.
///
/// `Manual` while the app manages restoration itself; `Auto` across page
/// unload so hard reloads and back-navigation from other sites use the
/// browser's own restoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollRestoration {
    Auto,
    Manual,
}

impl ScrollRestoration {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollRestoration::Auto => "auto",
            ScrollRestoration::Manual => "manual",
        }
    }
}

impl std::fmt::Display for ScrollRestoration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScrollRestoration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ScrollRestoration::Auto),
            "manual" => Ok(ScrollRestoration::Manual),
            _ => Err(format!("Unknown scroll restoration mode: {}", s)),
        }
    }
}
