//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::config::Settings;
use crate::events::EventStore;
use crate::roles::RoleDirectory;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Snapshot of the upstream proposal event log
    pub events: EventStore,

    /// Actor login -> governance role lookup
    pub roles: RoleDirectory,

    /// Governance thresholds and server settings
    pub settings: Settings,
}

impl AppState {
    pub fn new(events: EventStore, roles: RoleDirectory, settings: Settings) -> Self {
        Self {
            events,
            roles,
            settings,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
