use std::sync::Arc;

use crate::application::errors::StorageError;
use crate::domain::entities::{CommandLogEntry, CommandStatus, LogId};
use crate::domain::traits::CommandLogStore;

/// Best-effort writer for the command activity log.
///
/// Store failures are reported and swallowed: a lost log row is preferable to a
/// lost reply. Every call is awaited, so a write always completes or fails
/// before the caller moves on.
#[derive(Clone)]
pub struct CommandLog {
    store: Arc<dyn CommandLogStore>,
}

impl CommandLog {
    pub fn new(store: Arc<dyn CommandLogStore>) -> Self {
        Self { store }
    }

    /// Insert a pending entry. Returns `None` when the store rejected it.
    pub async fn write(&self, entry: &CommandLogEntry) -> Option<LogId> {
        match self.store.insert(entry).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("Failed to log {} command from {}: {}", entry.command, entry.sender, e);
                None
            }
        }
    }

    /// Resolve the entry created by `write`
    pub async fn update(&self, id: LogId, status: CommandStatus, details: &str) {
        if let Err(e) = self.store.update_by_id(id, status, details).await {
            tracing::error!("Failed to update command log {} to {}: {}", id, status, e);
        }
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<CommandLogEntry>, StorageError> {
        self.store.query_recent(limit).await
    }
}
