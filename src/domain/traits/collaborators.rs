use async_trait::async_trait;
use crate::application::errors::CollaboratorError;
use crate::domain::entities::Attachment;

/// Summarizer trait - produces a textual summary of a folder
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    async fn summarize(&self, folder: &str) -> Result<String, CollaboratorError>;
}

/// Media fetcher trait - downloads binary payloads attached to inbound messages
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, CollaboratorError>;
}
