use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a command log row
pub type LogId = Uuid;

/// Lifecycle state of a logged command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Pending,
    Success,
    Error,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandStatus::Pending => "pending",
            CommandStatus::Success => "success",
            CommandStatus::Error => "error",
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, CommandStatus::Pending)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CommandStatus::Pending),
            "success" => Ok(CommandStatus::Success),
            "error" => Ok(CommandStatus::Error),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// One row of the command activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandLogEntry {
    pub id: LogId,
    pub command: String,
    pub status: CommandStatus,
    pub timestamp: DateTime<Utc>,
    pub details: String,
    pub sender: String,
}

impl CommandLogEntry {
    /// New entry in the pending state
    pub fn pending(command: impl Into<String>, details: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: command.into(),
            status: CommandStatus::Pending,
            timestamp: Utc::now(),
            details: details.into(),
            sender: sender.into(),
        }
    }
}

/// Counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStats {
    pub total: usize,
    pub success: usize,
    pub pending: usize,
    pub error: usize,
}

impl LogStats {
    pub fn from_entries(entries: &[CommandLogEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut stats, entry| {
            stats.total += 1;
            match entry.status {
                CommandStatus::Success => stats.success += 1,
                CommandStatus::Pending => stats.pending += 1,
                CommandStatus::Error => stats.error += 1,
            }
            stats
        })
    }
}
