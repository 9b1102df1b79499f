//! The navigation orchestrator
//!
//! One `Router` instance lives for the tab lifetime, shared behind `Arc`
//! with the event listener layer and the render collaborator. Nested
//! navigations (redirects during rendering) are tracked with a depth
//! counter; the start/end lifecycle signals fire only on the outermost
//! transition into and out of a navigation.
//!
//! Overlapping navigations are tolerated, not cancelled: when a newer
//! navigation starts while another is in flight, both run to completion and
//! the last history/view mutation wins.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use url::Url;

use keel_history::{EntryState, History, ScrollPosition, Viewport};
use keel_routing::{NavigationInfo, RouteDefinition, RouteMatcher};

use crate::config::{RouterConfig, TrailingSlash};
use crate::error::RouterError;
use crate::renderer::{NavigationOptions, NavigationOutcome, RenderResult, Renderer};
use crate::Result;

const SIGNAL_CAPACITY: usize = 16;

/// Coarse navigation lifecycle signal, observable by the surrounding app
/// (e.g. to drive a loading indicator). Carries no payload beyond the fact
/// of the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    Start,
    End,
}

/// Options for [`Router::goto`].
#[derive(Debug, Clone, Default)]
pub struct GotoOptions {
    /// Preserve the current scroll position instead of resetting it.
    pub no_scroll: bool,
    /// Replace the current history entry instead of pushing a new one.
    pub replace_state: bool,
    pub keep_focus: bool,
    /// Caller-supplied entry state, stored verbatim.
    pub state: EntryState,
}

pub struct Router {
    matcher: RouteMatcher,
    trailing_slash: TrailingSlash,
    renderer: Arc<dyn Renderer>,
    history: Arc<dyn History>,
    viewport: Arc<dyn Viewport>,
    enabled: RwLock<bool>,
    /// Depth of nested navigations caused by redirects during rendering.
    navigating: Mutex<u32>,
    signals: broadcast::Sender<NavigationPhase>,
}

impl Router {
    pub fn new(
        config: RouterConfig,
        routes: Vec<RouteDefinition>,
        renderer: Arc<dyn Renderer>,
        history: Arc<dyn History>,
        viewport: Arc<dyn Viewport>,
    ) -> Self {
        let current = history.current_url();
        let matcher = RouteMatcher::new(&current, config.base, routes);

        // re-create the current entry so there is a well-formed one to
        // return to
        history.replace(history.current_state(), &current);

        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);

        Self {
            matcher,
            trailing_slash: config.trailing_slash,
            renderer,
            history,
            viewport,
            enabled: RwLock::new(true),
            navigating: Mutex::new(0),
            signals,
        }
    }

    pub fn history(&self) -> Arc<dyn History> {
        Arc::clone(&self.history)
    }

    pub fn viewport(&self) -> Arc<dyn Viewport> {
        Arc::clone(&self.viewport)
    }

    pub fn base(&self) -> &str {
        self.matcher.base()
    }

    /// Resume click/popstate interception and app-level `goto` handling.
    pub fn enable(&self) {
        *self.enabled.write() = true;
        tracing::debug!("router enabled");
    }

    /// Suspend interception. Does not cancel a navigation already in
    /// flight; raw browser navigation remains as the fallback.
    pub fn disable(&self) {
        *self.enabled.write() = false;
        tracing::debug!("router disabled");
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.read()
    }

    pub fn is_navigating(&self) -> bool {
        *self.navigating.lock() > 0
    }

    /// True iff the URL is on the app's origin and inside its base path.
    pub fn owns(&self, url: &Url) -> bool {
        self.matcher.owns(url)
    }

    /// Observe navigation start/end transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationPhase> {
        self.signals.subscribe()
    }

    /// Resolve and load a route ahead of navigation, bypassing history and
    /// the navigating counter, so a subsequent real navigation to the same
    /// URL can reuse the loaded data.
    pub async fn prefetch(&self, url: &Url) -> Result<RenderResult> {
        let info = self
            .matcher
            .resolve(url)?
            .ok_or_else(|| RouterError::NotOwned(url.clone()))?;

        tracing::debug!(url = %info.url, "prefetching");
        self.renderer.load(&info).await.map_err(RouterError::Render)
    }

    /// Public navigation entry point. `href` is resolved against the
    /// current location. App-owned targets get a history entry (push or
    /// replace per the options) and a full navigation; anything else falls
    /// back to a full browser navigation, and the returned future never
    /// resolves because control has left the single-page app.
    pub async fn goto(&self, href: &str, options: GotoOptions, chain: Vec<Url>) -> Result<()> {
        let url = self
            .history
            .current_url()
            .join(href)
            .map_err(|source| RouterError::InvalidHref(href.to_string(), source))?;

        if self.is_enabled() && self.owns(&url) {
            if options.replace_state {
                self.history.replace(options.state, &url);
            } else {
                self.history.push(options.state, &url);
            }

            let scroll = options
                .no_scroll
                .then(|| self.viewport.scroll_position());
            let fragment = url.fragment().map(str::to_owned);

            return self
                .navigate(&url, scroll, options.keep_focus, chain, fragment)
                .await;
        }

        self.history.assign(&url);
        std::future::pending::<()>().await;
        Ok(())
    }

    /// Run one navigation to an app-owned URL. Callers other than `goto`
    /// must pre-check ownership; a `NotOwned` failure here is a programming
    /// error and fails loudly.
    ///
    /// The history entry for the target must already exist (pushed at the
    /// trigger site, or the browser moved the pointer on popstate); this
    /// only replaces it to fix up the URL shape.
    pub async fn navigate(
        &self,
        url: &Url,
        scroll: Option<ScrollPosition>,
        keep_focus: bool,
        chain: Vec<Url>,
        fragment: Option<String>,
    ) -> Result<()> {
        self.navigate_inner(url.clone(), scroll, keep_focus, chain, fragment)
            .await
    }

    // Boxed so redirect-following can recurse.
    fn navigate_inner(
        &self,
        url: Url,
        scroll: Option<ScrollPosition>,
        keep_focus: bool,
        chain: Vec<Url>,
        fragment: Option<String>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if !self.owns(&url) {
                return Err(RouterError::NotOwned(url));
            }

            self.begin();
            let result = self
                .run_navigation(url, scroll, keep_focus, chain, fragment)
                .await;
            // the counter must come back down on every exit path, or the
            // end signal would be wedged forever
            self.end();
            result
        })
    }

    async fn run_navigation(
        &self,
        url: Url,
        scroll: Option<ScrollPosition>,
        keep_focus: bool,
        chain: Vec<Url>,
        fragment: Option<String>,
    ) -> Result<()> {
        let normalized = self.normalize(&url);

        // fix up the URL shape in place, carrying the current entry state
        // forward; never creates an extra entry
        self.history
            .replace(self.history.current_state(), &normalized);

        let info = self
            .matcher
            .resolve(&normalized)?
            .ok_or_else(|| RouterError::NotOwned(normalized.clone()))?;

        tracing::debug!(url = %info.url, routes = info.routes.len(), "navigating");

        let options = NavigationOptions {
            fragment,
            scroll,
            keep_focus,
        };

        let outcome = self
            .renderer
            .handle_navigation(&info, &chain, false, &options)
            .await
            .map_err(RouterError::Render)?;

        match outcome {
            NavigationOutcome::Complete => Ok(()),
            NavigationOutcome::Redirect(location) => {
                self.follow_redirect(info, chain, keep_focus, location).await
            }
        }
    }

    async fn follow_redirect(
        &self,
        info: NavigationInfo,
        mut chain: Vec<Url>,
        keep_focus: bool,
        location: String,
    ) -> Result<()> {
        let target = info
            .url
            .join(&location)
            .map_err(|source| RouterError::InvalidRedirect(location.clone(), source))?;

        if chain.contains(&target) {
            return Err(RouterError::RedirectLoop(target));
        }

        if !self.owns(&target) {
            // redirected out of the app
            self.history.assign(&target);
            return Ok(());
        }

        tracing::debug!(from = %info.url, to = %target, "following redirect");

        self.history
            .replace(self.history.current_state(), &target);
        chain.push(info.url);

        let fragment = target.fragment().map(str::to_owned);
        self.navigate_inner(target, None, keep_focus, chain, fragment)
            .await
    }

    fn begin(&self) {
        let mut depth = self.navigating.lock();
        if *depth == 0 {
            tracing::debug!("navigation start");
            let _ = self.signals.send(NavigationPhase::Start);
        }
        *depth += 1;
    }

    fn end(&self) {
        let mut depth = self.navigating.lock();
        *depth -= 1;
        if *depth == 0 {
            tracing::debug!("navigation end");
            let _ = self.signals.send(NavigationPhase::End);
        }
    }

    fn normalize(&self, url: &Url) -> Url {
        let path = self.trailing_slash.apply(url.path());
        if path == url.path() {
            return url.clone();
        }

        let mut normalized = url.clone();
        normalized.set_path(&path);
        normalized
    }
}
