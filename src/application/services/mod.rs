//! Application services - Business logic orchestration

pub mod command_log;

pub use command_log::CommandLog;
