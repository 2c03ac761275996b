//! Operation handlers - one per command kind

pub mod files;
pub mod summary;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::HandlerError;
use crate::domain::entities::{CommandKind, InboundMessage};
use crate::domain::traits::{DriveStorage, MediaFetcher, Summarizer};

pub use files::{DeleteHandler, ListHandler, MoveHandler, RenameHandler};
pub use summary::SummaryHandler;
pub use upload::UploadHandler;

/// Handler result: reply text on success
pub type HandlerResult = Result<String, HandlerError>;

/// Executes one kind of command
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Kind this handler is registered under
    fn kind(&self) -> CommandKind;

    /// Run the command. `message` is the inbound message the arguments came from,
    /// giving access to the sender and any attached media.
    async fn execute(&self, args: &[String], message: &InboundMessage) -> HandlerResult;
}

/// Required positional argument, rejecting absent or blank values
pub(crate) fn required<'a>(args: &'a [String], index: usize, name: &'static str) -> Result<&'a str, HandlerError> {
    match args.get(index).map(|s| s.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(HandlerError::MissingArgument(name)),
    }
}

/// Registry mapping command kinds to their handlers
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<CommandKind, Arc<dyn CommandHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the six file-operation handlers wired to the given collaborators
    pub fn with_defaults(
        drive: Arc<dyn DriveStorage>,
        media: Arc<dyn MediaFetcher>,
        summarizer: Option<Arc<dyn Summarizer>>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(ListHandler::new(drive.clone()));
        registry.register(DeleteHandler::new(drive.clone()));
        registry.register(MoveHandler::new(drive.clone()));
        registry.register(RenameHandler::new(drive.clone()));
        registry.register(UploadHandler::new(drive, media));
        registry.register(SummaryHandler::new(summarizer));
        registry
    }

    /// Register a handler, replacing any previous handler for the same kind
    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        let kind = handler.kind();
        if kind == CommandKind::Unknown {
            tracing::warn!("Ignoring handler registered for UNKNOWN");
            return;
        }
        self.handlers.insert(kind, Arc::new(handler));
    }

    pub fn get(&self, kind: CommandKind) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
