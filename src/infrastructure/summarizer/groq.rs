//! Groq summarizer - Folder summaries from a chat completion over the listing

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::CollaboratorError;
use crate::domain::traits::{DriveEntry, DriveStorage, Summarizer};

/// Groq API endpoint
const API_BASE: &str = "https://api.groq.com/openai/v1";

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Listing lines sent to the model
const MAX_LISTED_ENTRIES: usize = 200;

const SYSTEM_PROMPT: &str = "You summarize the contents of a cloud storage folder for a user reading on a phone. \
Reply in at most five short sentences of plain text, no markdown.";

/// Summarizer backed by Groq chat completions
pub struct GroqSummarizer {
    api_key: String,
    client: Client,
    model: String,
    base_url: String,
    drive: Arc<dyn DriveStorage>,
}

impl GroqSummarizer {
    pub fn new(
        api_key: impl Into<String>,
        model: Option<&str>,
        drive: Arc<dyn DriveStorage>,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            api_key: api_key.into(),
            client: Client::builder().timeout(timeout).build()?,
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: API_BASE.to_string(),
            drive,
        })
    }

    /// Point at an OpenAI-compatible server other than Groq
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug)]
struct ChatMessage {
    role: String,
    content: String,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChatMessage,
}

/// User prompt describing the folder
fn build_prompt(folder: &str, entries: &[DriveEntry]) -> String {
    if entries.is_empty() {
        return format!("The folder {} is empty.", folder);
    }

    let mut prompt = format!("Summarize the folder {} which contains {} items:\n", folder, entries.len());
    for entry in entries.iter().take(MAX_LISTED_ENTRIES) {
        prompt.push_str("- ");
        prompt.push_str(&entry.display_name());
        prompt.push('\n');
    }
    if entries.len() > MAX_LISTED_ENTRIES {
        prompt.push_str(&format!("(and {} more)\n", entries.len() - MAX_LISTED_ENTRIES));
    }
    prompt
}

#[async_trait]
impl Summarizer for GroqSummarizer {
    fn name(&self) -> &str {
        "groq"
    }

    async fn summarize(&self, folder: &str) -> Result<String, CollaboratorError> {
        let entries = self.drive.list(folder).await?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(folder, &entries),
                },
            ],
            temperature: 0.3,
            max_tokens: 300,
            stream: false,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(CollaboratorError::Api("rate limited".to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api(format!("status: {}, body: {}", status, body)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Api(format!("invalid completion response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| CollaboratorError::Api("No choices in response".to_string()))
    }
}
