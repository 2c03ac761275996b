use async_trait::async_trait;
use crate::application::errors::StorageError;
use crate::domain::entities::{CommandLogEntry, CommandStatus, LogId};

/// Store trait - persistence for the command activity log
#[async_trait]
pub trait CommandLogStore: Send + Sync {
    /// Insert a new entry and return its id
    async fn insert(&self, entry: &CommandLogEntry) -> Result<LogId, StorageError>;

    /// Set the status and details of an existing entry
    async fn update_by_id(&self, id: LogId, status: CommandStatus, details: &str) -> Result<(), StorageError>;

    /// Most recent entries, newest first
    async fn query_recent(&self, limit: usize) -> Result<Vec<CommandLogEntry>, StorageError>;
}
