//! Media download for attachments on inbound messages

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::errors::CollaboratorError;
use crate::domain::entities::Attachment;
use crate::domain::traits::MediaFetcher;

/// Largest payload accepted for upload (WhatsApp media limit)
pub const MAX_MEDIA_BYTES: u64 = 16 * 1024 * 1024;

/// Fetches Twilio media URLs, authenticating with the account credentials when set
pub struct TwilioMediaFetcher {
    client: Client,
    credentials: Option<(String, String)>,
    max_bytes: u64,
}

impl TwilioMediaFetcher {
    pub fn new(credentials: Option<(String, String)>, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            credentials,
            max_bytes: MAX_MEDIA_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn too_large(&self) -> CollaboratorError {
        CollaboratorError::Api(format!("attachment exceeds {} bytes", self.max_bytes))
    }
}

#[async_trait]
impl MediaFetcher for TwilioMediaFetcher {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, CollaboratorError> {
        let mut request = self.client.get(&attachment.url);
        if let Some((sid, token)) = &self.credentials {
            request = request.basic_auth(sid, Some(token));
        }

        let mut response = request.send().await?;
        if !response.status().is_success() {
            return Err(CollaboratorError::Api(format!(
                "media download failed with status {}",
                response.status()
            )));
        }

        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(self.too_large());
        }

        // Content-Length is absent on chunked responses, so the cap is enforced while reading
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(self.too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(
            "Fetched {} bytes of {}",
            bytes.len(),
            attachment.content_type.as_deref().unwrap_or("unknown media")
        );
        Ok(bytes)
    }
}
