//! Extendable events
//!
//! Keeps a lifecycle event alive until its asynchronous work settles.

use std::future::Future;

use smol::Task;

use crate::AgentError;

/// Tracks background work tied to a single lifecycle event.
///
/// The host runs the agent in a short-lived execution context that it may
/// reclaim as soon as an event handler returns. Work that must outlive the
/// handler body is registered with [`ExtendableEvent::wait_until`] and
/// joined in [`ExtendableEvent::settle`] before the event is reported
/// complete. Registered work starts running immediately.
#[derive(Default)]
pub struct ExtendableEvent {
    pending: Vec<Task<Result<(), AgentError>>>,
}

impl ExtendableEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the event's lifetime until `work` settles.
    pub fn wait_until<F>(&mut self, work: F)
    where
        F: Future<Output = Result<(), AgentError>> + Send + 'static,
    {
        self.pending.push(smol::spawn(work));
    }

    /// Number of registered pieces of work still tracked.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Await all registered work. The first error fails the event and
    /// cancels whatever is still outstanding.
    pub async fn settle(self) -> Result<(), AgentError> {
        for task in self.pending {
            task.await?;
        }
        Ok(())
    }
}
