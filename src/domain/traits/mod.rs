//! Domain traits - Abstractions for infrastructure implementations

pub mod collaborators;
pub mod drive;
pub mod store;

pub use collaborators::{MediaFetcher, Summarizer};
pub use drive::{DriveEntry, DriveStorage};
pub use store::CommandLogStore;
