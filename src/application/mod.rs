//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Handlers: One executor per command kind
//! - Services: Command log lifecycle
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing and dispatching

pub mod errors;
pub mod handlers;
pub mod messaging;
pub mod services;
