//! Command dispatcher - Routes parsed commands to handlers and logs their lifecycle

use std::time::Duration;

use crate::application::errors::{CollaboratorError, HandlerError};
use crate::application::handlers::{CommandHandler, HandlerRegistry, HandlerResult};
use crate::application::services::CommandLog;
use crate::domain::entities::{CommandKind, CommandLogEntry, CommandStatus, InboundMessage, ParsedCommand};
use super::parser::CommandParser;

/// Reply for verbs that have no handler
pub const HELP_TEXT: &str = "Unknown command. Available commands: LIST, DELETE, MOVE, RENAME, UPLOAD, SUMMARY";

/// Default bound on a single handler invocation
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// Command dispatcher - one handler execution and one log entry per inbound message
pub struct CommandDispatcher {
    parser: CommandParser,
    handlers: HandlerRegistry,
    log: CommandLog,
    handler_timeout: Duration,
}

impl CommandDispatcher {
    pub fn new(handlers: HandlerRegistry, log: CommandLog) -> Self {
        Self {
            parser: CommandParser::new(),
            handlers,
            log,
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
        }
    }

    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    /// Parse and dispatch an inbound message
    pub async fn process(&self, message: &InboundMessage) -> String {
        let command = self.parser.parse(&message.body);
        self.dispatch(&command, message).await
    }

    /// Dispatch a parsed command. Never fails: every outcome becomes reply text.
    ///
    /// The pending log write completes before the handler runs, and the status
    /// update completes before the reply is returned.
    pub async fn dispatch(&self, command: &ParsedCommand, message: &InboundMessage) -> String {
        let entry = CommandLogEntry::pending(log_name(command), message.body.as_str(), message.sender.as_str());
        let log_id = self.log.write(&entry).await;

        let (reply, status) = match self.handlers.get(command.kind) {
            Some(handler) => match self.invoke(handler.as_ref(), command, message).await {
                Ok(reply) => (reply, CommandStatus::Success),
                Err(e) => {
                    tracing::warn!("{} from {} failed: {}", command.kind, message.sender, e);
                    (format!("Error: {}", e), CommandStatus::Error)
                }
            },
            None => (HELP_TEXT.to_string(), CommandStatus::Error),
        };

        if let Some(id) = log_id {
            self.log.update(id, status, &reply).await;
        }

        tracing::info!(
            "[{}] {} -> {} ({})",
            message.sender,
            entry.command,
            status,
            message.message_id
        );
        reply
    }

    /// A single bounded handler call. No retry: remote operations are not idempotent.
    async fn invoke(&self, handler: &dyn CommandHandler, command: &ParsedCommand, message: &InboundMessage) -> HandlerResult {
        match tokio::time::timeout(self.handler_timeout, handler.execute(&command.arguments, message)).await {
            Ok(result) => result,
            Err(_) => Err(HandlerError::Collaborator(CollaboratorError::Timeout(self.handler_timeout))),
        }
    }
}

/// Value stored in the log's `command` column
fn log_name(command: &ParsedCommand) -> &str {
    if command.verb.is_empty() {
        CommandKind::Unknown.verb()
    } else {
        &command.verb
    }
}
