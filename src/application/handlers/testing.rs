//! Test doubles for handler collaborators

use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::errors::CollaboratorError;
use crate::domain::entities::Attachment;
use crate::domain::traits::{DriveEntry, DriveStorage, MediaFetcher, Summarizer};

/// Drive that records every call and answers from canned data
#[derive(Default)]
pub struct RecordingDrive {
    pub calls: Mutex<Vec<String>>,
    pub entries: Vec<DriveEntry>,
    pub fail_with: Option<String>,
}

impl RecordingDrive {
    pub fn with_entries(entries: Vec<DriveEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), CollaboratorError> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(msg) => Err(CollaboratorError::Api(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DriveStorage for RecordingDrive {
    async fn list(&self, folder: &str) -> Result<Vec<DriveEntry>, CollaboratorError> {
        self.record(format!("list {}", folder))?;
        Ok(self.entries.clone())
    }

    async fn delete(&self, path: &str) -> Result<(), CollaboratorError> {
        self.record(format!("delete {}", path))
    }

    async fn move_item(&self, source: &str, destination: &str) -> Result<(), CollaboratorError> {
        self.record(format!("move {} {}", source, destination))
    }

    async fn rename(&self, path: &str, new_name: &str) -> Result<(), CollaboratorError> {
        self.record(format!("rename {} {}", path, new_name))
    }

    async fn upload(&self, folder: &str, filename: &str, payload: &[u8]) -> Result<u64, CollaboratorError> {
        self.record(format!("upload {} {} {}", folder, filename, payload.len()))?;
        Ok(payload.len() as u64)
    }
}

/// Media fetcher returning fixed bytes
pub struct StaticMedia(pub Vec<u8>);

#[async_trait]
impl MediaFetcher for StaticMedia {
    async fn fetch(&self, _attachment: &Attachment) -> Result<Vec<u8>, CollaboratorError> {
        Ok(self.0.clone())
    }
}

/// Summarizer returning a fixed result
pub struct StaticSummarizer(pub Result<String, String>);

#[async_trait]
impl Summarizer for StaticSummarizer {
    fn name(&self) -> &str {
        "static"
    }

    async fn summarize(&self, folder: &str) -> Result<String, CollaboratorError> {
        match &self.0 {
            Ok(text) => Ok(format!("{}: {}", folder, text)),
            Err(msg) => Err(CollaboratorError::Api(msg.clone())),
        }
    }
}
