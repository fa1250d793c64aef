//! Notifications
//!
//! Displayed alerts and the platform seams that show them and route their
//! clicks back into the application.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

static NOTIFICATION_ID: AtomicU64 = AtomicU64::new(1);

/// A displayed notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    /// Navigation target carried as associated data; resolved on click.
    pub target: Option<String>,
}

impl Notification {
    pub fn new(
        title: String,
        body: String,
        icon: &str,
        badge: &str,
        target: Option<String>,
    ) -> Self {
        Self {
            id: NOTIFICATION_ID.fetch_add(1, Ordering::SeqCst),
            title,
            body,
            icon: icon.to_string(),
            badge: badge.to_string(),
            target,
        }
    }
}

/// Platform error
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

/// Seam to the platform's notification display.
pub trait NotificationSink: Send + Sync + 'static {
    fn show(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    fn close(&self, id: u64) -> impl Future<Output = Result<(), PlatformError>> + Send;
}

/// Seam to the platform's open page instances.
pub trait Clients: Send + Sync + 'static {
    /// Take control of all currently open pages.
    fn claim(&self) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Focus an existing page for `url` or open a new one.
    fn open_or_focus(&self, url: &str) -> impl Future<Output = Result<(), PlatformError>> + Send;
}

/// Desktop notification sink backed by `notify-send` on Linux.
///
/// Display is best-effort; closing is left to the desktop environment.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for DesktopNotifier {
    async fn show(&self, notification: Notification) -> Result<(), PlatformError> {
        tracing::info!(id = notification.id, title = %notification.title, "showing notification");

        #[cfg(target_os = "linux")]
        {
            let status = smol::process::Command::new("notify-send")
                .arg(&notification.title)
                .arg(&notification.body)
                .status()
                .await
                .map_err(|err| PlatformError(err.to_string()))?;

            if !status.success() {
                return Err(PlatformError(format!("notify-send exited with {status}")));
            }
        }

        Ok(())
    }

    async fn close(&self, id: u64) -> Result<(), PlatformError> {
        tracing::debug!(id, "closing notification");
        Ok(())
    }
}
