//! In-memory command log store

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::entities::{CommandLogEntry, CommandStatus, LogId};
use crate::domain::traits::CommandLogStore;

/// Volatile store, used by `exec` and tests
#[derive(Default, Clone)]
pub struct MemoryLogStore {
    entries: Arc<RwLock<Vec<CommandLogEntry>>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommandLogStore for MemoryLogStore {
    async fn insert(&self, entry: &CommandLogEntry) -> Result<LogId, StorageError> {
        let mut entries = self.entries.write().await;
        entries.push(entry.clone());
        Ok(entry.id)
    }

    async fn update_by_id(&self, id: LogId, status: CommandStatus, details: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        entry.status = status;
        entry.details = details.to_string();
        Ok(())
    }

    async fn query_recent(&self, limit: usize) -> Result<Vec<CommandLogEntry>, StorageError> {
        let entries = self.entries.read().await;
        // Insertion order breaks timestamp ties
        let mut recent: Vec<CommandLogEntry> = entries.iter().rev().cloned().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        Ok(recent)
    }
}
