//! Platform adapters

pub mod console;
pub mod twilio;

pub use console::ConsoleAdapter;
pub use twilio::{AppState, TwilioMediaFetcher};
