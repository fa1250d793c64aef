//! Navigation interception
//!
//! Request model and the network seam. Navigations go network-first; the
//! precached offline document substitutes only when the network itself is
//! unreachable. Responses that did reach the network pass through
//! unmodified whatever their status, and sub-resource requests are never
//! touched.

use std::future::Future;

use kohl_cache::CachedResponse;

/// How a request was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    Cors,
    NoCors,
}

/// What the requested resource will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDestination {
    Document,
    Script,
    Style,
    Image,
    Font,
    Fetch,
    Unknown,
}

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub method: String,
    pub mode: RequestMode,
    pub destination: RequestDestination,
}

impl Request {
    /// A top-level page navigation.
    pub fn navigation(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: "GET".to_string(),
            mode: RequestMode::Navigate,
            destination: RequestDestination::Document,
        }
    }

    /// A sub-resource fetch (script, image, ...).
    pub fn subresource(url: &str, destination: RequestDestination) -> Self {
        Self {
            url: url.to_string(),
            method: "GET".to_string(),
            mode: RequestMode::NoCors,
            destination,
        }
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

/// What the agent decided for an intercepted request.
#[derive(Debug, Clone)]
pub enum FetchDecision {
    /// Not handled; the host performs its default fetch.
    Passthrough,
    /// Respond with this snapshot (live network response or offline page).
    Respond(CachedResponse),
}

/// Network error
///
/// Only raised when the network was not reached; an HTTP error status is a
/// normal `Ok` response.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Network seam used for precaching and live navigations.
pub trait Network: Send + Sync + 'static {
    fn fetch(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<CachedResponse, NetError>> + Send;
}
