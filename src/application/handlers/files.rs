//! LIST, DELETE, MOVE and RENAME handlers

use std::sync::Arc;

use async_trait::async_trait;

use super::{required, CommandHandler, HandlerResult};
use crate::domain::entities::{CommandKind, InboundMessage};
use crate::domain::traits::DriveStorage;

/// LIST <folder>
pub struct ListHandler {
    drive: Arc<dyn DriveStorage>,
}

impl ListHandler {
    pub fn new(drive: Arc<dyn DriveStorage>) -> Self {
        Self { drive }
    }
}

#[async_trait]
impl CommandHandler for ListHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::List
    }

    async fn execute(&self, args: &[String], _message: &InboundMessage) -> HandlerResult {
        let folder = required(args, 0, "folder path")?;
        tracing::debug!("LIST {}", folder);

        let entries = self.drive.list(folder).await?;
        if entries.is_empty() {
            return Ok(format!("Folder {} is empty.", folder));
        }

        let mut reply = format!("Files in {}:", folder);
        for entry in &entries {
            reply.push_str("\n- ");
            reply.push_str(&entry.display_name());
        }
        Ok(reply)
    }
}

/// DELETE <file>
pub struct DeleteHandler {
    drive: Arc<dyn DriveStorage>,
}

impl DeleteHandler {
    pub fn new(drive: Arc<dyn DriveStorage>) -> Self {
        Self { drive }
    }
}

#[async_trait]
impl CommandHandler for DeleteHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::Delete
    }

    async fn execute(&self, args: &[String], _message: &InboundMessage) -> HandlerResult {
        let path = required(args, 0, "file path")?;
        tracing::debug!("DELETE {}", path);

        self.drive.delete(path).await?;
        Ok(format!("File {} deleted successfully.", path))
    }
}

/// MOVE <source> <destination>
pub struct MoveHandler {
    drive: Arc<dyn DriveStorage>,
}

impl MoveHandler {
    pub fn new(drive: Arc<dyn DriveStorage>) -> Self {
        Self { drive }
    }
}

#[async_trait]
impl CommandHandler for MoveHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::Move
    }

    async fn execute(&self, args: &[String], _message: &InboundMessage) -> HandlerResult {
        let source = required(args, 0, "source path")?;
        let destination = required(args, 1, "destination path")?;
        tracing::debug!("MOVE {} -> {}", source, destination);

        self.drive.move_item(source, destination).await?;
        Ok(format!("Moved {} to {} successfully.", source, destination))
    }
}

/// RENAME <old name> <new name>
pub struct RenameHandler {
    drive: Arc<dyn DriveStorage>,
}

impl RenameHandler {
    pub fn new(drive: Arc<dyn DriveStorage>) -> Self {
        Self { drive }
    }
}

#[async_trait]
impl CommandHandler for RenameHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::Rename
    }

    async fn execute(&self, args: &[String], _message: &InboundMessage) -> HandlerResult {
        let old_name = required(args, 0, "old name")?;
        let new_name = required(args, 1, "new name")?;
        tracing::debug!("RENAME {} -> {}", old_name, new_name);

        self.drive.rename(old_name, new_name).await?;
        Ok(format!("Renamed {} to {} successfully.", old_name, new_name))
    }
}
