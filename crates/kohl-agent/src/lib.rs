//! Kohlmeyer offline agent
//!
//! Event-driven agent that sits between the dashboard and the network:
//! it precaches the core pages at install time, serves a precached offline
//! fallback when a page navigation cannot reach the network, prunes stale
//! cache versions on activation, and bridges push messages into displayed
//! notifications whose clicks focus or open a target page.
//!
//! ## Lifecycle
//! 1. **Install**: fetch and store the precache manifest, all-or-nothing
//! 2. **Activate**: prune stale cache versions, claim open pages
//! 3. **Steady state**: intercept navigations, receive pushes, route clicks
//!
//! The host may tear the execution context down between events; every
//! handler keeps its asynchronous work alive through an [`ExtendableEvent`]
//! and joins it before returning.

pub mod agent;
pub mod config;
pub mod event;
pub mod fetch;
pub mod lifecycle;
pub mod net;
pub mod notify;
pub mod push;

pub use agent::{Agent, Registration};
pub use config::{AgentConfig, ConfigError};
pub use event::ExtendableEvent;
pub use fetch::{FetchDecision, NetError, Network, Request, RequestDestination, RequestMode};
pub use kohl_cache::{Bucket, CacheStorage, CachedResponse};
pub use lifecycle::AgentState;
pub use net::HttpNetwork;
pub use notify::{Clients, DesktopNotifier, Notification, NotificationSink, PlatformError};
pub use push::PushPayload;

/// Agent error
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("precache fetch failed for {url}: {source}")]
    Precache { url: String, source: NetError },

    #[error("offline document missing from cache bucket {bucket}")]
    OfflineDocumentMissing { bucket: String },

    #[error("event not allowed in lifecycle state {0:?}")]
    InvalidState(AgentState),
}
