//! SUMMARY handler

use std::sync::Arc;

use async_trait::async_trait;

use super::{required, CommandHandler, HandlerResult};
use crate::application::errors::CollaboratorError;
use crate::domain::entities::{CommandKind, InboundMessage};
use crate::domain::traits::Summarizer;

/// SUMMARY <folder>
pub struct SummaryHandler {
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl SummaryHandler {
    pub fn new(summarizer: Option<Arc<dyn Summarizer>>) -> Self {
        Self { summarizer }
    }
}

#[async_trait]
impl CommandHandler for SummaryHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::Summary
    }

    async fn execute(&self, args: &[String], _message: &InboundMessage) -> HandlerResult {
        let folder = required(args, 0, "folder path")?;

        let summarizer = self
            .summarizer
            .as_ref()
            .ok_or_else(|| CollaboratorError::Unavailable("summarization service".to_string()))?;

        tracing::debug!("SUMMARY {} via {}", folder, summarizer.name());
        Ok(summarizer.summarize(folder).await?)
    }
}
