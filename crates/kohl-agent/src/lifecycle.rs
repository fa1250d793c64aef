//! Agent lifecycle
//!
//! Per-version state machine. Install always precedes activate; only an
//! activated version handles fetch and push events. A superseded version
//! ends in `Redundant` and never leaves it.

/// Lifecycle state of one agent version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

impl AgentState {
    /// Check if this state allows fetch, push, and click handling.
    pub fn can_handle_events(&self) -> bool {
        matches!(self, AgentState::Activated)
    }

    /// Check if the version has been superseded.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Redundant)
    }
}
