//! Actor-role directory
//!
//! Maps actor logins to their governance role (editor, proposal author, or
//! other). The directory is an external collaborator's data; missing entries
//! degrade classification rather than failing it.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Governance role of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Editor,
    Author,
    Other,
}

/// Thread-safe login -> role lookup
#[derive(Clone)]
pub struct RoleDirectory {
    inner: Arc<RwLock<HashMap<String, ActorRole>>>,
}

impl RoleDirectory {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Build a directory from a JSON export: `{"login": "editor", ...}`
    pub fn from_snapshot(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Upstream(format!("role directory {} unreachable: {}", path.display(), e))
        })?;
        let entries: HashMap<String, ActorRole> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Upstream(format!("role directory {} unreadable: {}", path.display(), e))
        })?;
        Ok(Self {
            inner: Arc::new(RwLock::new(entries)),
        })
    }

    pub async fn insert(&self, login: impl Into<String>, role: ActorRole) {
        let mut map = self.inner.write().await;
        map.insert(login.into(), role);
    }

    /// Point-in-time copy for pure classification calls
    pub async fn snapshot(&self) -> HashMap<String, ActorRole> {
        let map = self.inner.read().await;
        map.clone()
    }

    pub async fn count(&self) -> usize {
        let map = self.inner.read().await;
        map.len()
    }
}

impl Default for RoleDirectory {
    fn default() -> Self {
        Self::new()
    }
}
