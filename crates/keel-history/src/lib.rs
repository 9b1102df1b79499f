//! Keel history and scroll memory
//!
//! Abstraction over the browser history stack: per-entry opaque state bags
//! (with one reserved key for scroll offsets), scroll-restoration mode, and
//! a viewport handle for reading the current scroll position. The in-memory
//! implementations back tests and embedding shells that drive the router
//! outside a real browser.

mod history;
mod scroll;
mod state;
mod viewport;

pub use history::{History, MemoryHistory};
pub use scroll::{ScrollPosition, ScrollRestoration};
pub use state::EntryState;
pub use viewport::{MemoryViewport, Viewport};
