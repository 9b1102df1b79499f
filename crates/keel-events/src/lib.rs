//! Keel event listener layer
//!
//! Translates low-level browser signals (link clicks, history popstate,
//! scroll, pointer movement) into navigation and prefetch intents on the
//! router, with the filtering needed to avoid hijacking navigations the
//! user did not intend to delegate to the app.

mod debounce;
mod event;
mod listeners;

pub use debounce::Debounce;
pub use event::{Anchor, ClickEvent, Disposition, Modifiers, PopStateEvent, PRIMARY_BUTTON};
pub use listeners::{Listeners, HOVER_DEBOUNCE, SCROLL_DEBOUNCE};
