use chrono::{DateTime, Utc};

/// Media reference delivered alongside a text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub content_type: Option<String>,
}

impl Attachment {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// An inbound message from the messaging provider
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub body: String,
    /// Sender address, e.g. `whatsapp:+14155238886`
    pub sender: String,
    /// Provider correlation id. Not used for deduplication.
    pub message_id: String,
    pub attachments: Vec<Attachment>,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(body: impl Into<String>, sender: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            sender: sender.into(),
            message_id: message_id.into(),
            attachments: Vec::new(),
            received_at: Utc::now(),
        }
    }

    /// Message typed on the local console
    pub fn from_console(body: impl Into<String>) -> Self {
        Self::new(body, "console", uuid::Uuid::new_v4().to_string())
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}
