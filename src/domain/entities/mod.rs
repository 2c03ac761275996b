//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod log;
pub mod message;

pub use command::{CommandKind, ParsedCommand};
pub use log::{CommandLogEntry, CommandStatus, LogId, LogStats};
pub use message::{Attachment, InboundMessage};
