//! Event handlers
//!
//! One `Listeners` instance is wired up at application bootstrap and holds
//! the router handle plus the two debounce slots. Each handler is a pure
//! function of the event snapshot and current router state, with side
//! effects limited to cancelling the default action (via the returned
//! [`Disposition`]), mutating history and invoking the router.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use keel_core::Router;
use keel_history::{EntryState, History, ScrollRestoration, Viewport};

use crate::debounce::Debounce;
use crate::event::{Anchor, ClickEvent, Disposition, PopStateEvent, PRIMARY_BUTTON};

/// iOS delivers scroll events every 30-150ms, sometimes around 200ms.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(200);
/// Sustained-hover threshold before a prefetch is considered intentional.
pub const HOVER_DEBOUNCE: Duration = Duration::from_millis(20);

pub struct Listeners {
    router: Arc<Router>,
    history: Arc<dyn History>,
    viewport: Arc<dyn Viewport>,
    scroll_debounce: Debounce,
    hover_debounce: Debounce,
}

impl Listeners {
    /// Wire up the listener layer. Switches the browser's automatic scroll
    /// restoration to manual so it does not fight the router's own
    /// restoration logic.
    pub fn new(router: Arc<Router>) -> Self {
        let history = router.history();
        let viewport = router.viewport();

        history.set_scroll_restoration(ScrollRestoration::Manual);

        Self {
            router,
            history,
            viewport,
            scroll_debounce: Debounce::new(SCROLL_DEBOUNCE),
            hover_debounce: Debounce::new(HOVER_DEBOUNCE),
        }
    }

    /// Click interception. Returns whether the default browser navigation
    /// must be cancelled. Navigation errors are logged, not surfaced: error
    /// display is the render collaborator's job.
    pub async fn handle_click(&self, event: ClickEvent) -> Disposition {
        if !self.router.is_enabled() {
            return Disposition::Browser;
        }
        if event.button != PRIMARY_BUTTON || event.modifiers.any() {
            return Disposition::Browser;
        }
        if event.default_prevented {
            return Disposition::Browser;
        }

        let Some(anchor) = event.anchor else {
            return Disposition::Browser;
        };
        let Some(href) = anchor.href.as_deref() else {
            return Disposition::Browser;
        };

        let current = self.history.current_url();
        let Ok(url) = current.join(href) else {
            tracing::debug!(href, "ignoring click on unparsable href");
            return Disposition::Browser;
        };

        if url == current {
            // suppress a same-URL reload; an exact fragment link keeps its
            // default in-page behavior
            if url.fragment().is_none() {
                return Disposition::Handled;
            }
            return Disposition::Browser;
        }

        if anchor.download || anchor.is_external_rel() {
            return Disposition::Browser;
        }
        if anchor.has_target() {
            return Disposition::Browser;
        }
        if !self.router.owns(&url) {
            return Disposition::Browser;
        }

        if strip_fragment(&url) == strip_fragment(&current) {
            // fragment-only change: record the entry so back works, let the
            // default in-page fragment scroll happen
            self.history.push(EntryState::new(), &url);
            return Disposition::Browser;
        }

        self.history.push(EntryState::new(), &url);

        let scroll = anchor.no_scroll.then(|| self.viewport.scroll_position());
        let fragment = url.fragment().map(str::to_owned);

        if let Err(error) = self
            .router
            .navigate(&url, scroll, false, Vec::new(), fragment)
            .await
        {
            tracing::error!(%url, %error, "click navigation failed");
        }

        Disposition::Handled
    }

    /// Back/forward interception. The browser already moved the history
    /// pointer; this starts a navigation to the now-current location with
    /// the scroll position stored in its entry, and never pushes.
    pub async fn handle_popstate(&self, event: PopStateEvent) {
        let Some(state) = event.state else {
            return;
        };
        if !self.router.is_enabled() {
            return;
        }

        let url = self.history.current_url();
        let scroll = state.scroll();

        if let Err(error) = self
            .router
            .navigate(&url, scroll, false, Vec::new(), None)
            .await
        {
            tracing::error!(%url, %error, "popstate navigation failed");
        }
    }

    /// Sustained pointer hover. The anchor snapshot moves into the timer
    /// closure because the event's dispatch path is gone by the time it
    /// fires.
    pub fn handle_pointer_move(&self, anchor: Option<Anchor>) {
        let router = Arc::clone(&self.router);
        let history = Arc::clone(&self.history);

        self.hover_debounce.arm(async move {
            prefetch_anchor(&router, &history, anchor).await;
        });
    }

    /// Touch is an immediate prefetch hint, no debounce.
    pub async fn handle_touch_start(&self, anchor: Option<Anchor>) {
        prefetch_anchor(&self.router, &self.history, anchor).await;
    }

    /// Debounced persistence of the current scroll offsets into the current
    /// entry's state bag, so returning to this exact entry restores the
    /// position even across a full page reload.
    pub fn handle_scroll(&self) {
        let history = Arc::clone(&self.history);
        let viewport = Arc::clone(&self.viewport);

        self.scroll_debounce.arm(async move {
            let mut state = history.current_state();
            state.set_scroll(viewport.scroll_position());
            history.replace(state, &history.current_url());
        });
    }

    /// Returning to this page: the app manages restoration again.
    pub fn handle_page_load(&self) {
        self.history.set_scroll_restoration(ScrollRestoration::Manual);
    }

    /// Leaving the page: hand restoration back to the browser so hard
    /// reloads and back-navigation from other sites restore scroll.
    pub fn handle_before_unload(&self) {
        self.history.set_scroll_restoration(ScrollRestoration::Auto);
    }
}

async fn prefetch_anchor(router: &Router, history: &Arc<dyn History>, anchor: Option<Anchor>) {
    let Some(anchor) = anchor else { return };
    if !anchor.prefetch {
        return;
    }
    let Some(href) = anchor.href.as_deref() else {
        return;
    };
    let Ok(url) = history.current_url().join(href) else {
        return;
    };

    if let Err(error) = router.prefetch(&url).await {
        tracing::debug!(%url, %error, "prefetch failed");
    }
}

fn strip_fragment(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;
    use async_trait::async_trait;
    use keel_core::{
        BoxError, NavigationOptions, NavigationOutcome, RenderResult, Renderer, RouterConfig,
        TrailingSlash,
    };
    use keel_history::{MemoryHistory, MemoryViewport, ScrollPosition};
    use keel_routing::{NavigationInfo, PathPattern, RouteDefinition, RouteMetadata};
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[derive(Default)]
    struct TestRenderer {
        navigations: Mutex<Vec<(String, NavigationOptions)>>,
        loads: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Renderer for TestRenderer {
        async fn handle_navigation(
            &self,
            info: &NavigationInfo,
            _chain: &[Url],
            _is_initial: bool,
            options: &NavigationOptions,
        ) -> Result<NavigationOutcome, BoxError> {
            self.navigations
                .lock()
                .push((info.path.clone(), options.clone()));
            Ok(NavigationOutcome::Complete)
        }

        async fn load(&self, info: &NavigationInfo) -> Result<RenderResult, BoxError> {
            self.loads.lock().push(info.id.clone());
            Ok(RenderResult {
                id: info.id.clone(),
                data: Value::Null,
            })
        }
    }

    struct Fixture {
        listeners: Listeners,
        router: Arc<Router>,
        renderer: Arc<TestRenderer>,
        history: Arc<MemoryHistory>,
        viewport: Arc<MemoryViewport>,
    }

    fn fixture(start: &str) -> Fixture {
        let history = Arc::new(MemoryHistory::new(Url::parse(start).unwrap()));
        let viewport = Arc::new(MemoryViewport::new());
        let renderer = Arc::new(TestRenderer::default());

        let routes = vec![
            RouteDefinition::new(PathPattern::parse("/").unwrap(), RouteMetadata::new("index")),
            RouteDefinition::new(PathPattern::parse("/a").unwrap(), RouteMetadata::new("a")),
            RouteDefinition::new(
                PathPattern::parse("/posts/:id").unwrap(),
                RouteMetadata::new("posts/:id"),
            ),
        ];

        let router = Arc::new(Router::new(
            RouterConfig {
                base: String::new(),
                trailing_slash: TrailingSlash::Ignore,
            },
            routes,
            renderer.clone() as Arc<dyn Renderer>,
            history.clone() as Arc<dyn History>,
            viewport.clone() as Arc<dyn Viewport>,
        ));

        Fixture {
            listeners: Listeners::new(Arc::clone(&router)),
            router,
            renderer,
            history,
            viewport,
        }
    }

    fn navigations(f: &Fixture) -> Vec<(String, NavigationOptions)> {
        f.renderer.navigations.lock().clone()
    }

    #[tokio::test]
    async fn test_click_intercepts_owned_link() {
        let f = fixture("https://app.example/");

        let disposition = f
            .listeners
            .handle_click(ClickEvent::on_anchor(Anchor::to("/a")))
            .await;

        assert_eq!(disposition, Disposition::Handled);
        assert_eq!(f.history.len(), 2);
        assert_eq!(f.history.current_url().path(), "/a");

        let calls = navigations(&f);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/a");
        // scroll resets by default
        assert_eq!(calls[0].1.scroll, None);
    }

    #[tokio::test]
    async fn test_click_ignores_modified_and_secondary_clicks() {
        let f = fixture("https://app.example/");

        let modified = ClickEvent {
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
            ..ClickEvent::on_anchor(Anchor::to("/a"))
        };
        assert_eq!(f.listeners.handle_click(modified).await, Disposition::Browser);

        let secondary = ClickEvent {
            button: 1,
            ..ClickEvent::on_anchor(Anchor::to("/a"))
        };
        assert_eq!(
            f.listeners.handle_click(secondary).await,
            Disposition::Browser
        );

        let prevented = ClickEvent {
            default_prevented: true,
            ..ClickEvent::on_anchor(Anchor::to("/a"))
        };
        assert_eq!(
            f.listeners.handle_click(prevented).await,
            Disposition::Browser
        );

        assert_eq!(f.history.len(), 1);
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test]
    async fn test_click_ignores_optout_anchors() {
        let f = fixture("https://app.example/");

        let download = Anchor {
            download: true,
            ..Anchor::to("/a")
        };
        let external = Anchor {
            rel: Some("external".to_string()),
            ..Anchor::to("/a")
        };
        let targeted = Anchor {
            target: Some("_blank".to_string()),
            ..Anchor::to("/a")
        };

        for anchor in [download, external, targeted] {
            let disposition = f.listeners.handle_click(ClickEvent::on_anchor(anchor)).await;
            assert_eq!(disposition, Disposition::Browser);
        }

        assert_eq!(f.history.len(), 1);
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test]
    async fn test_click_leaves_foreign_urls_to_the_browser() {
        let f = fixture("https://app.example/");

        let disposition = f
            .listeners
            .handle_click(ClickEvent::on_anchor(Anchor::to(
                "https://other.example/page",
            )))
            .await;

        assert_eq!(disposition, Disposition::Browser);
        assert_eq!(f.history.len(), 1);
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test]
    async fn test_click_same_url_suppresses_reload() {
        let f = fixture("https://app.example/a");

        let disposition = f
            .listeners
            .handle_click(ClickEvent::on_anchor(Anchor::to("/a")))
            .await;

        assert_eq!(disposition, Disposition::Handled);
        assert_eq!(f.history.len(), 1);
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test]
    async fn test_click_fragment_only_pushes_without_rendering() {
        let f = fixture("https://app.example/a#x");

        let disposition = f
            .listeners
            .handle_click(ClickEvent::on_anchor(Anchor::to("/a#y")))
            .await;

        // entry recorded so back works, default in-page scroll proceeds
        assert_eq!(disposition, Disposition::Browser);
        assert_eq!(f.history.len(), 2);
        assert_eq!(f.history.current_url().fragment(), Some("y"));
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test]
    async fn test_click_no_scroll_marker_preserves_position() {
        let f = fixture("https://app.example/");
        f.viewport.set_scroll(ScrollPosition::new(0.0, 640.0));

        let anchor = Anchor {
            no_scroll: true,
            ..Anchor::to("/a")
        };
        f.listeners.handle_click(ClickEvent::on_anchor(anchor)).await;

        let calls = navigations(&f);
        assert_eq!(calls[0].1.scroll, Some(ScrollPosition::new(0.0, 640.0)));
    }

    #[tokio::test]
    async fn test_click_disabled_router_does_nothing() {
        let f = fixture("https://app.example/");
        f.router.disable();

        let disposition = f
            .listeners
            .handle_click(ClickEvent::on_anchor(Anchor::to("/a")))
            .await;

        assert_eq!(disposition, Disposition::Browser);
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test]
    async fn test_popstate_restores_stored_scroll() {
        let f = fixture("https://app.example/");

        // navigate to /a, scroll there, persist into the entry
        f.listeners
            .handle_click(ClickEvent::on_anchor(Anchor::to("/a")))
            .await;
        f.viewport.set_scroll(ScrollPosition::new(120.0, 400.0));
        let mut state = f.history.current_state();
        state.set_scroll(f.viewport.scroll_position());
        f.history.replace(state, &f.history.current_url());

        // on to /posts/5, then back
        f.listeners
            .handle_click(ClickEvent::on_anchor(Anchor::to("/posts/5")))
            .await;
        let state = f.history.back();
        f.listeners
            .handle_popstate(PopStateEvent { state })
            .await;

        let calls = navigations(&f);
        let last = calls.last().unwrap();
        assert_eq!(last.0, "/a");
        assert_eq!(last.1.scroll, Some(ScrollPosition::new(120.0, 400.0)));
        // popstate never pushes
        assert_eq!(f.history.len(), 3);
    }

    #[tokio::test]
    async fn test_popstate_without_state_is_ignored() {
        let f = fixture("https://app.example/");

        f.listeners.handle_popstate(PopStateEvent::default()).await;
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test]
    async fn test_popstate_disabled_router_is_ignored() {
        let f = fixture("https://app.example/");
        f.router.disable();

        f.listeners
            .handle_popstate(PopStateEvent {
                state: Some(EntryState::new()),
            })
            .await;
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_capture_debounces_and_merges() {
        let f = fixture("https://app.example/");

        // a key the router does not own must survive the scroll writes
        let mut state = f.history.current_state();
        state.insert("app:selection", json!({ "row": 7 }));
        f.history.replace(state, &f.history.current_url());

        for y in [100.0, 200.0, 300.0] {
            f.viewport.set_scroll(ScrollPosition::new(0.0, y));
            f.listeners.handle_scroll();
            tokio::time::advance(Duration::from_millis(50)).await;
            settle().await;
        }

        // still inside the debounce window
        assert_eq!(f.history.current_state().scroll(), None);

        tokio::time::advance(Duration::from_millis(250)).await;
        settle().await;

        let state = f.history.current_state();
        assert_eq!(state.scroll(), Some(ScrollPosition::new(0.0, 300.0)));
        assert_eq!(state.get("app:selection"), Some(&json!({ "row": 7 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_prefetch_is_debounced() {
        let f = fixture("https://app.example/");

        let anchor = Anchor {
            prefetch: true,
            ..Anchor::to("/posts/5")
        };

        // two quick hovers collapse into one prefetch
        f.listeners.handle_pointer_move(Some(anchor.clone()));
        tokio::time::advance(Duration::from_millis(5)).await;
        settle().await;
        f.listeners.handle_pointer_move(Some(anchor));

        tokio::time::advance(Duration::from_millis(30)).await;
        settle().await;

        assert_eq!(f.renderer.loads.lock().clone(), vec!["/posts/5".to_string()]);
        // prefetch bypasses history and the view
        assert_eq!(f.history.len(), 1);
        assert!(navigations(&f).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_without_prefetch_marker_does_nothing() {
        let f = fixture("https://app.example/");

        f.listeners.handle_pointer_move(Some(Anchor::to("/posts/5")));
        tokio::time::advance(Duration::from_millis(30)).await;
        settle().await;

        assert!(f.renderer.loads.lock().is_empty());
    }

    #[tokio::test]
    async fn test_touch_start_prefetches_immediately() {
        let f = fixture("https://app.example/");

        let anchor = Anchor {
            prefetch: true,
            ..Anchor::to("/posts/9")
        };
        f.listeners.handle_touch_start(Some(anchor)).await;

        assert_eq!(f.renderer.loads.lock().clone(), vec!["/posts/9".to_string()]);
    }

    #[tokio::test]
    async fn test_lifecycle_switches_scroll_restoration() {
        let f = fixture("https://app.example/");

        // wiring up the listeners already switched it to manual
        assert_eq!(f.history.scroll_restoration(), ScrollRestoration::Manual);

        f.listeners.handle_before_unload();
        assert_eq!(f.history.scroll_restoration(), ScrollRestoration::Auto);

        f.listeners.handle_page_load();
        assert_eq!(f.history.scroll_restoration(), ScrollRestoration::Manual);
    }
}
