//! Remote summarization function

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::errors::CollaboratorError;
use crate::domain::traits::Summarizer;

/// Calls an HTTP function that summarizes a folder.
///
/// Request: `POST {endpoint}` with JSON `{"folder": ...}`.
/// Response: JSON `{"summary": ...}`.
pub struct RemoteSummarizer {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    folder: &'a str,
}

#[derive(Deserialize, Debug)]
struct SummarizeResponse {
    summary: String,
}

impl RemoteSummarizer {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, CollaboratorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl Summarizer for RemoteSummarizer {
    fn name(&self) -> &str {
        "remote"
    }

    async fn summarize(&self, folder: &str) -> Result<String, CollaboratorError> {
        let mut request = self.client.post(&self.endpoint).json(&SummarizeRequest { folder });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api(format!("status: {}, body: {}", status, body)));
        }

        let parsed: SummarizeResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Api(format!("invalid summary response: {}", e)))?;
        Ok(parsed.summary)
    }
}
