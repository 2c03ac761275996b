//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database / Storage: Command log persistence
//! - Drive: File storage backend
//! - Summarizer: Folder summarization services
//! - Adapters: Platform integrations (Twilio webhook, console)

pub mod adapters;
pub mod config;
pub mod database;
pub mod drive;
pub mod storage;
pub mod summarizer;
