//! Message handling - Command parsing and dispatching

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{CommandDispatcher, DEFAULT_HANDLER_TIMEOUT, HELP_TEXT};
pub use parser::CommandParser;
