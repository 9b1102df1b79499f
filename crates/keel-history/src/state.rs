//! Per-entry history state bags
//!
//! The browser persists one opaque key-value bag per history entry. Keel
//! owns exactly one reserved key in it (the scroll offset); everything else
//! is caller-supplied and must survive our writes. Entries can outlive the
//! page load, so values are plain JSON.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::scroll::ScrollPosition;

/// The one key keel owns inside an entry's bag.
const SCROLL_KEY: &str = "keel:scroll";

/// Opaque per-entry state bag.
///
/// Mutations are read-merge-write: writing the scroll offset never touches
/// keys the router does not own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryState(Map<String, Value>);

impl EntryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Scroll offset stored in this entry, if any.
    pub fn scroll(&self) -> Option<ScrollPosition> {
        self.0
            .get(SCROLL_KEY)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn set_scroll(&mut self, position: ScrollPosition) {
        self.0
            .insert(SCROLL_KEY.to_string(), json!({ "x": position.x, "y": position.y }));
    }
}

impl From<Map<String, Value>> for EntryState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_round_trip() {
        let mut state = EntryState::new();
        assert!(state.scroll().is_none());

        state.set_scroll(ScrollPosition::new(120.0, 400.0));
        assert_eq!(state.scroll(), Some(ScrollPosition::new(120.0, 400.0)));
    }

    #[test]
    fn test_set_scroll_preserves_foreign_keys() {
        let mut state = EntryState::new();
        state.insert("app:selection", json!({ "row": 3 }));

        state.set_scroll(ScrollPosition::new(0.0, 250.0));
        state.set_scroll(ScrollPosition::new(0.0, 300.0));

        assert_eq!(state.get("app:selection"), Some(&json!({ "row": 3 })));
        assert_eq!(state.scroll(), Some(ScrollPosition::new(0.0, 300.0)));
    }
}
