//! Router error types

use thiserror::Error;
use url::Url;

use crate::renderer::BoxError;

#[derive(Error, Debug)]
pub enum RouterError {
    /// Resolution requested for a URL outside this app instance (wrong
    /// origin or outside the base path). A programming error in the caller
    /// everywhere except `goto`, which falls back to a full browser
    /// navigation instead of erroring.
    #[error("URL does not belong to this app: {0}")]
    NotOwned(Url),

    #[error("Could not resolve href: {0}")]
    InvalidHref(String, #[source] url::ParseError),

    #[error("Redirect loop detected at {0}")]
    RedirectLoop(Url),

    #[error("Invalid redirect location: {0}")]
    InvalidRedirect(String, #[source] url::ParseError),

    #[error(transparent)]
    Routing(#[from] keel_routing::RoutingError),

    #[error("Renderer error: {0}")]
    Render(#[source] BoxError),
}
