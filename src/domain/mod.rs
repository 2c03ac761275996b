//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (InboundMessage, ParsedCommand, CommandLogEntry)
//! - Traits: Abstractions for collaborators (DriveStorage, Summarizer, CommandLogStore)

pub mod entities;
pub mod traits;
