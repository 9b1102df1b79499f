//! Render collaborator contract
//!
//! The router does not render anything itself. It hands a resolved
//! [`NavigationInfo`] to an external collaborator that loads route data and
//! mounts components, and otherwise only does history and counter
//! bookkeeping around that call.

use async_trait::async_trait;
use url::Url;

use keel_history::ScrollPosition;
use keel_routing::NavigationInfo;

/// Errors crossing the renderer seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Options forwarded with a navigation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationOptions {
    /// Fragment to scroll to after rendering, if any.
    pub fragment: Option<String>,
    /// Scroll position to restore; `None` means reset to the top.
    pub scroll: Option<ScrollPosition>,
    /// Leave focus where it is instead of resetting it.
    pub keep_focus: bool,
}

/// What the renderer did with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Complete,
    /// The data-load layer answered with a redirect. The orchestrator
    /// resolves the location against the current URL and follows it.
    Redirect(String),
}

/// Result of a prefetch-only load. The collaborator caches it under `id` so
/// a subsequent real navigation can reuse the loaded data.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub id: String,
    pub data: serde_json::Value,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Load route data and mount the matched components. `chain` carries
    /// the URLs already visited while following redirects.
    async fn handle_navigation(
        &self,
        info: &NavigationInfo,
        chain: &[Url],
        is_initial: bool,
        options: &NavigationOptions,
    ) -> Result<NavigationOutcome, BoxError>;

    /// Load-only step for prefetching; must not touch history or the view.
    async fn load(&self, info: &NavigationInfo) -> Result<RenderResult, BoxError>;
}
