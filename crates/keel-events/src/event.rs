//! Browser event snapshots
//!
//! The listener layer consumes snapshot values rather than live events: in
//! the source event model the dispatch path is only available while the
//! event is being dispatched, so the anchor found on it is captured eagerly
//! and carried by value into any deferred work.

/// Anchor-like element found on an event's dispatch path, with the
/// attributes the router inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    /// Resolvable href, relative or absolute.
    pub href: Option<String>,
    /// `target` attribute; a non-empty value addresses another browsing
    /// context.
    pub target: Option<String>,
    /// Space-separated `rel` attribute.
    pub rel: Option<String>,
    /// `download` attribute present.
    pub download: bool,
    /// Opt-in prefetch marker.
    pub prefetch: bool,
    /// Opt-out marker for the post-navigation scroll reset.
    pub no_scroll: bool,
}

impl Anchor {
    pub fn to(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// True if the `rel` attribute marks this link as external.
    pub fn is_external_rel(&self) -> bool {
        self.rel
            .as_deref()
            .map(|rel| rel.split_whitespace().any(|token| token == "external"))
            .unwrap_or(false)
    }

    /// True if the anchor addresses another browsing context.
    pub fn has_target(&self) -> bool {
        self.target.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

pub const PRIMARY_BUTTON: u8 = 0;

#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
    pub button: u8,
    pub modifiers: Modifiers,
    /// Anchor found on the dispatch path, if any.
    pub anchor: Option<Anchor>,
    /// Another handler already claimed the event.
    pub default_prevented: bool,
}

impl ClickEvent {
    /// Plain primary-button click on an anchor.
    pub fn on_anchor(anchor: Anchor) -> Self {
        Self {
            anchor: Some(anchor),
            ..Self::default()
        }
    }
}

/// Browser back/forward transition. `state` is the bag of the entry that is
/// now current; browser-created entries (plain fragment jumps) carry none.
#[derive(Debug, Clone, Default)]
pub struct PopStateEvent {
    pub state: Option<keel_history::EntryState>,
}

/// Whether the browser's default action should proceed, or the event was
/// taken over by the router (default must be cancelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Browser,
    Handled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_rel_detection() {
        let mut anchor = Anchor::to("/a");
        assert!(!anchor.is_external_rel());

        anchor.rel = Some("nofollow external noopener".to_string());
        assert!(anchor.is_external_rel());

        anchor.rel = Some("externally".to_string());
        assert!(!anchor.is_external_rel());
    }

    #[test]
    fn test_target_detection() {
        let mut anchor = Anchor::to("/a");
        assert!(!anchor.has_target());

        anchor.target = Some(String::new());
        assert!(!anchor.has_target());

        anchor.target = Some("_blank".to_string());
        assert!(anchor.has_target());
    }
}
