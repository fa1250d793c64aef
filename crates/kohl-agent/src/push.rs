//! Push payloads
//!
//! Decodes inbound push messages into notification content. The payload is
//! parsed once and all display defaults are resolved here, at a single
//! boundary, rather than scattered through display logic.

use serde::Deserialize;

use crate::config::AgentConfig;
use crate::notify::Notification;

/// Decoded push message.
///
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub url: Option<String>,
}

impl PushPayload {
    /// Decode raw push bytes.
    ///
    /// An absent or malformed payload degrades to the empty payload; a bad
    /// push must never crash the agent or surface an error to the user.
    pub fn decode(raw: Option<&[u8]>) -> Self {
        raw.and_then(|bytes| serde_json::from_slice(bytes).ok())
            .unwrap_or_default()
    }

    /// Resolve defaults into a displayable notification.
    pub fn resolve(self, config: &AgentConfig) -> Notification {
        Notification::new(
            self.title.unwrap_or_else(|| config.default_title.clone()),
            self.body.unwrap_or_else(|| config.default_body.clone()),
            &config.icon_path,
            &config.badge_path,
            Some(self.url.unwrap_or_else(|| config.default_target.clone())),
        )
    }
}
