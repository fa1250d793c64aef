//! Agent configuration
//!
//! One config per agent version. The version string is threaded explicitly
//! so two versions can run side by side without shared global state.

/// Configuration for one agent version.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Cache bucket identity, e.g. "kohlmeyer-v1".
    pub version: String,
    /// Same-origin paths fetched and stored at install time.
    pub precache: Vec<String>,
    /// Path of the offline fallback document. Must appear in `precache`.
    pub offline_path: String,
    /// Icon attached to displayed notifications.
    pub icon_path: String,
    /// Badge attached to displayed notifications.
    pub badge_path: String,
    /// Title used when a push payload carries none.
    pub default_title: String,
    /// Body used when a push payload carries none.
    pub default_body: String,
    /// Click target used when a push payload carries none.
    pub default_target: String,
    /// Activate as soon as install finishes instead of waiting for all
    /// existing pages to close.
    pub skip_waiting: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: "kohlmeyer-v1".to_string(),
            precache: vec![
                "/".to_string(),
                "/dashboard".to_string(),
                "/offline".to_string(),
            ],
            offline_path: "/offline".to_string(),
            icon_path: "/icon-192.png".to_string(),
            badge_path: "/icon-192.png".to_string(),
            default_title: "Kohlmeyer Equity Alert".to_string(),
            default_body: "New market alert available".to_string(),
            default_target: "/alerts".to_string(),
            skip_waiting: true,
        }
    }
}

impl AgentConfig {
    /// Create a config for a given version, keeping the default manifest.
    pub fn for_version(version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..Self::default()
        }
    }

    /// Check config invariants.
    ///
    /// The offline fallback is served straight from the bucket, so it must
    /// be part of the precache manifest.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.is_empty() {
            return Err(ConfigError::EmptyVersion);
        }
        if !self.precache.iter().any(|path| path == &self.offline_path) {
            return Err(ConfigError::OfflineNotPrecached {
                path: self.offline_path.clone(),
            });
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cache version must not be empty")]
    EmptyVersion,

    #[error("offline fallback {path} is not in the precache manifest")]
    OfflineNotPrecached { path: String },
}
