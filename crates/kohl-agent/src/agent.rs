//! The offline agent
//!
//! Per-version event handlers and host-side registration. One logical agent
//! runs per origin; the durable state is the shared cache storage, and every
//! handler keeps its asynchronous work alive through an [`ExtendableEvent`]
//! joined before the handler returns.

use std::sync::{Arc, Mutex};

use kohl_cache::{Bucket, CacheStorage};

use crate::AgentError;
use crate::config::AgentConfig;
use crate::event::ExtendableEvent;
use crate::fetch::{FetchDecision, Network, Request};
use crate::lifecycle::AgentState;
use crate::notify::{Clients, Notification, NotificationSink};
use crate::push::PushPayload;

/// One version of the offline agent.
pub struct Agent<N, S, C> {
    config: AgentConfig,
    state: Mutex<AgentState>,
    storage: Arc<Mutex<CacheStorage>>,
    network: Arc<N>,
    notifications: Arc<S>,
    clients: Arc<C>,
}

impl<N, S, C> Agent<N, S, C>
where
    N: Network,
    S: NotificationSink,
    C: Clients,
{
    pub fn new(
        config: AgentConfig,
        storage: Arc<Mutex<CacheStorage>>,
        network: Arc<N>,
        notifications: Arc<S>,
        clients: Arc<C>,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self {
            config,
            state: Mutex::new(AgentState::Parsed),
            storage,
            network,
            notifications,
            clients,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn state(&self) -> AgentState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// Mark this version as superseded.
    pub fn mark_redundant(&self) {
        self.set_state(AgentState::Redundant);
    }

    /// Install: fetch the precache manifest into a fresh bucket.
    ///
    /// All-or-nothing: the bucket is staged aside and inserted wholesale
    /// only once every manifest entry has been fetched, so a failure leaves
    /// previously installed versions untouched and this version redundant.
    pub async fn on_install(&self) -> Result<(), AgentError> {
        self.transition(AgentState::Parsed, AgentState::Installing)?;

        let network = self.network.clone();
        let storage = self.storage.clone();
        let version = self.config.version.clone();
        let manifest = self.config.precache.clone();

        let mut event = ExtendableEvent::new();
        event.wait_until(async move {
            let mut bucket = Bucket::new(&version);
            for path in &manifest {
                let response =
                    network
                        .fetch(path)
                        .await
                        .map_err(|source| AgentError::Precache {
                            url: path.clone(),
                            source,
                        })?;
                bucket.put(path, response);
            }

            storage
                .lock()
                .expect("cache storage lock poisoned")
                .install(bucket);
            Ok(())
        });

        match event.settle().await {
            Ok(()) => {
                self.set_state(AgentState::Installed);
                tracing::info!(version = %self.config.version, "agent installed");
                Ok(())
            }
            Err(err) => {
                self.set_state(AgentState::Redundant);
                tracing::warn!(version = %self.config.version, %err, "install failed");
                Err(err)
            }
        }
    }

    /// Activate: prune stale bucket versions and claim open pages.
    ///
    /// Pruning is best-effort per bucket and the whole operation is
    /// idempotent; re-activating with no new version installed is a no-op.
    pub async fn on_activate(&self) -> Result<(), AgentError> {
        {
            let mut state = self.state.lock().expect("state lock poisoned");
            match *state {
                AgentState::Installed | AgentState::Activated => {
                    *state = AgentState::Activating;
                }
                other => return Err(AgentError::InvalidState(other)),
            }
        }

        let storage = self.storage.clone();
        let clients = self.clients.clone();
        let version = self.config.version.clone();

        let mut event = ExtendableEvent::new();
        event.wait_until(async move {
            let removed = {
                let mut storage = storage.lock().expect("cache storage lock poisoned");
                storage.prune(&version)
            };
            for name in &removed {
                tracing::debug!(bucket = %name, "pruned stale cache bucket");
            }

            if let Err(err) = clients.claim().await {
                tracing::warn!(%err, "client claim failed");
            }
            Ok(())
        });

        event.settle().await?;
        self.set_state(AgentState::Activated);
        tracing::info!(version = %self.config.version, "agent activated");
        Ok(())
    }

    /// Intercept a request.
    ///
    /// Sub-resources pass through untouched. Navigations go network-first;
    /// any response that reached the network is returned unmodified, and
    /// only a transport failure substitutes the precached offline document.
    pub async fn on_fetch(&self, request: &Request) -> Result<FetchDecision, AgentError> {
        self.require_active()?;

        if !request.is_navigation() {
            return Ok(FetchDecision::Passthrough);
        }

        match self.network.fetch(&request.url).await {
            Ok(response) => Ok(FetchDecision::Respond(response)),
            Err(err) => {
                tracing::debug!(url = %request.url, %err, "navigation failed, serving offline page");
                let offline = {
                    let storage = self.storage.lock().expect("cache storage lock poisoned");
                    storage
                        .bucket(&self.config.version)
                        .and_then(|bucket| bucket.match_url(&self.config.offline_path))
                        .cloned()
                };
                offline
                    .map(FetchDecision::Respond)
                    .ok_or_else(|| AgentError::OfflineDocumentMissing {
                        bucket: self.config.version.clone(),
                    })
            }
        }
    }

    /// Handle an inbound push message: decode, resolve defaults, display.
    ///
    /// Display failure is best-effort and never surfaced to the user.
    pub async fn on_push(&self, data: Option<&[u8]>) -> Result<(), AgentError> {
        self.require_active()?;

        let notification = PushPayload::decode(data).resolve(&self.config);
        let sink = self.notifications.clone();

        let mut event = ExtendableEvent::new();
        event.wait_until(async move {
            if let Err(err) = sink.show(notification).await {
                tracing::warn!(%err, "notification display failed");
            }
            Ok(())
        });
        event.settle().await
    }

    /// Handle a click on a displayed notification: dismiss it, then focus
    /// or open exactly one page for its target.
    pub async fn on_notification_click(
        &self,
        notification: Notification,
    ) -> Result<(), AgentError> {
        self.require_active()?;

        let sink = self.notifications.clone();
        let clients = self.clients.clone();
        let fallback = self.config.default_target.clone();

        let mut event = ExtendableEvent::new();
        event.wait_until(async move {
            if let Err(err) = sink.close(notification.id).await {
                tracing::warn!(id = notification.id, %err, "notification close failed");
            }

            let target = notification.target.as_deref().unwrap_or(&fallback);
            if let Err(err) = clients.open_or_focus(target).await {
                tracing::warn!(%target, %err, "focus-or-open failed");
            }
            Ok(())
        });
        event.settle().await
    }

    fn require_active(&self) -> Result<(), AgentError> {
        let state = self.state();
        if state.can_handle_events() {
            Ok(())
        } else {
            Err(AgentError::InvalidState(state))
        }
    }

    fn transition(&self, from: AgentState, to: AgentState) -> Result<(), AgentError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        if *state != from {
            return Err(AgentError::InvalidState(*state));
        }
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: AgentState) {
        *self.state.lock().expect("state lock poisoned") = to;
    }
}

/// Host-side bookkeeping of agent versions.
///
/// A newly installing version coexists with the active prior version until
/// it finishes activating, at which point the prior version becomes
/// redundant and its cache bucket has been pruned.
pub struct Registration<N, S, C> {
    waiting: Option<Arc<Agent<N, S, C>>>,
    active: Option<Arc<Agent<N, S, C>>>,
}

impl<N, S, C> Registration<N, S, C>
where
    N: Network,
    S: NotificationSink,
    C: Clients,
{
    pub fn new() -> Self {
        Self {
            waiting: None,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&Arc<Agent<N, S, C>>> {
        self.active.as_ref()
    }

    pub fn waiting(&self) -> Option<&Arc<Agent<N, S, C>>> {
        self.waiting.as_ref()
    }

    /// Install a new agent version.
    ///
    /// On success the version parks in the waiting slot, or is promoted
    /// immediately when its config skips the waiting hand-off. On failure
    /// the currently active version stays in control.
    pub async fn install(&mut self, agent: Arc<Agent<N, S, C>>) -> Result<(), AgentError> {
        let skip_waiting = agent.config().skip_waiting;

        agent.on_install().await?;
        self.waiting = Some(agent);

        if skip_waiting {
            self.activate_waiting().await?;
        }
        Ok(())
    }

    /// Promote the waiting version: activate it, swap it into the active
    /// slot, and mark the superseded version redundant.
    pub async fn activate_waiting(&mut self) -> Result<(), AgentError> {
        let Some(next) = self.waiting.take() else {
            return Ok(());
        };

        next.on_activate().await?;
        if let Some(prior) = self.active.replace(next) {
            prior.mark_redundant();
        }
        Ok(())
    }
}

impl<N, S, C> Default for Registration<N, S, C>
where
    N: Network,
    S: NotificationSink,
    C: Clients,
{
    fn default() -> Self {
        Self::new()
    }
}
