//! Keel navigation controller core
//!
//! The [`Router`] turns navigation intents into well-formed navigation
//! requests against a render collaborator: it resolves targets through the
//! route table, normalizes paths per the trailing-slash policy, keeps the
//! history stack well-formed, serializes nested navigations through a depth
//! counter and emits coarse start/end lifecycle signals.

mod config;
mod error;
mod renderer;
mod router;

pub use config::{RouterConfig, TrailingSlash};
pub use error::RouterError;
pub use renderer::{BoxError, NavigationOptions, NavigationOutcome, RenderResult, Renderer};
pub use router::{GotoOptions, NavigationPhase, Router};

pub type Result<T> = std::result::Result<T, RouterError>;
