//! History stack abstraction
//!
//! The history stack and its per-entry state bags are the only shared
//! mutable resource in the system. All mutations happen synchronously
//! within a single event turn; implementations are shared behind `Arc`.

use parking_lot::RwLock;
use url::Url;

use crate::scroll::ScrollRestoration;
use crate::state::EntryState;

/// Browser history surface the router reads and mutates.
pub trait History: Send + Sync {
    fn current_url(&self) -> Url;

    fn current_state(&self) -> EntryState;

    /// Add a new entry after the current one, discarding any forward
    /// entries, and make it current.
    fn push(&self, state: EntryState, url: &Url);

    /// Replace the current entry in place. Never creates an extra entry.
    fn replace(&self, state: EntryState, url: &Url);

    fn set_scroll_restoration(&self, mode: ScrollRestoration);

    /// Full browser navigation: control leaves the app.
    fn assign(&self, url: &Url);
}

struct Entries {
    list: Vec<(Url, EntryState)>,
    index: usize,
}

/// In-process history stack with browser semantics, for tests and embedding
/// shells that drive the router outside a real browser.
pub struct MemoryHistory {
    entries: RwLock<Entries>,
    restoration: RwLock<ScrollRestoration>,
    assigned: RwLock<Option<Url>>,
}

impl MemoryHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: RwLock::new(Entries {
                list: vec![(initial, EntryState::new())],
                index: 0,
            }),
            // the browser default, until the listener layer switches it
            restoration: RwLock::new(ScrollRestoration::Auto),
            assigned: RwLock::new(None),
        }
    }

    /// Move the cursor one entry back, returning the now-current entry's
    /// state (what a popstate event would deliver). `None` at the oldest
    /// entry.
    pub fn back(&self) -> Option<EntryState> {
        let mut entries = self.entries.write();
        if entries.index == 0 {
            return None;
        }
        entries.index -= 1;
        Some(entries.list[entries.index].1.clone())
    }

    /// Move the cursor one entry forward. `None` at the newest entry.
    pub fn forward(&self) -> Option<EntryState> {
        let mut entries = self.entries.write();
        if entries.index + 1 >= entries.list.len() {
            return None;
        }
        entries.index += 1;
        Some(entries.list[entries.index].1.clone())
    }

    /// Number of entries. Always at least 1: the stack is constructed with
    /// the initial entry and truncation keeps the current one.
    pub fn len(&self) -> usize {
        self.entries.read().list.len()
    }

    pub fn index(&self) -> usize {
        self.entries.read().index
    }

    pub fn scroll_restoration(&self) -> ScrollRestoration {
        *self.restoration.read()
    }

    /// URL of the last full browser navigation, if one happened.
    pub fn assigned(&self) -> Option<Url> {
        self.assigned.read().clone()
    }
}

impl History for MemoryHistory {
    fn current_url(&self) -> Url {
        let entries = self.entries.read();
        entries.list[entries.index].0.clone()
    }

    fn current_state(&self) -> EntryState {
        let entries = self.entries.read();
        entries.list[entries.index].1.clone()
    }

    fn push(&self, state: EntryState, url: &Url) {
        let mut entries = self.entries.write();
        let index = entries.index;
        entries.list.truncate(index + 1);
        entries.list.push((url.clone(), state));
        entries.index = entries.list.len() - 1;
    }

    fn replace(&self, state: EntryState, url: &Url) {
        let mut entries = self.entries.write();
        let index = entries.index;
        entries.list[index] = (url.clone(), state);
    }

    fn set_scroll_restoration(&self, mode: ScrollRestoration) {
        *self.restoration.write() = mode;
    }

    fn assign(&self, url: &Url) {
        tracing::debug!(%url, "leaving app via full browser navigation");
        *self.assigned.write() = Some(url.clone());
    }
}
