//! UPLOAD handler

use std::sync::Arc;

use async_trait::async_trait;

use super::{required, CommandHandler, HandlerResult};
use crate::domain::entities::{CommandKind, InboundMessage};
use crate::domain::traits::{DriveStorage, MediaFetcher};

/// UPLOAD <folder> <filename>
///
/// When the inbound message carries media, the first attachment is fetched and
/// stored as `folder/filename`. Without media the handler only acknowledges the
/// target; the user resends the command with the file attached.
pub struct UploadHandler {
    drive: Arc<dyn DriveStorage>,
    media: Arc<dyn MediaFetcher>,
}

impl UploadHandler {
    pub fn new(drive: Arc<dyn DriveStorage>, media: Arc<dyn MediaFetcher>) -> Self {
        Self { drive, media }
    }
}

/// `folder/filename` without doubling the separator
fn target_path(folder: &str, filename: &str) -> String {
    format!("{}/{}", folder.trim_end_matches('/'), filename)
}

#[async_trait]
impl CommandHandler for UploadHandler {
    fn kind(&self) -> CommandKind {
        CommandKind::Upload
    }

    async fn execute(&self, args: &[String], message: &InboundMessage) -> HandlerResult {
        let folder = required(args, 0, "folder path")?;
        let filename = required(args, 1, "filename")?;
        let target = target_path(folder, filename);

        let Some(attachment) = message.attachments.first() else {
            tracing::debug!("UPLOAD {} awaiting file", target);
            return Ok(format!("Ready to receive file for upload to {}", target));
        };

        if message.attachments.len() > 1 {
            tracing::warn!(
                "UPLOAD {} received {} attachments, storing only the first",
                target,
                message.attachments.len()
            );
        }

        let payload = self.media.fetch(attachment).await?;
        let written = self.drive.upload(folder, filename, &payload).await?;
        tracing::info!("Uploaded {} ({} bytes)", target, written);

        Ok(format!("Uploaded {} ({} bytes).", target, written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::HandlerError;
    use crate::application::handlers::testing::{RecordingDrive, StaticMedia};
    use crate::domain::entities::Attachment;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_upload_without_media_acknowledges_target() {
        let drive = Arc::new(RecordingDrive::default());
        let handler = UploadHandler::new(drive.clone(), Arc::new(StaticMedia(vec![])));
        let message = InboundMessage::new("UPLOAD /Reports file.pdf", "whatsapp:+1", "SM1");

        let reply = handler.execute(&args(&["/Reports", "file.pdf"]), &message).await.unwrap();
        assert_eq!(reply, "Ready to receive file for upload to /Reports/file.pdf");
        assert!(drive.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_with_media_stores_payload() {
        let drive = Arc::new(RecordingDrive::default());
        let handler = UploadHandler::new(drive.clone(), Arc::new(StaticMedia(b"%PDF-1.7".to_vec())));
        let message = InboundMessage::new("UPLOAD /Reports/ file.pdf", "whatsapp:+1", "SM2")
            .with_attachment(Attachment::new("https://media.example/ME1").with_content_type("application/pdf"));

        let reply = handler.execute(&args(&["/Reports/", "file.pdf"]), &message).await.unwrap();
        assert_eq!(reply, "Uploaded /Reports/file.pdf (8 bytes).");
        assert_eq!(drive.calls(), vec!["upload /Reports/ file.pdf 8"]);
    }

    #[tokio::test]
    async fn test_upload_requires_filename() {
        let drive = Arc::new(RecordingDrive::default());
        let handler = UploadHandler::new(drive.clone(), Arc::new(StaticMedia(vec![1])));
        let message = InboundMessage::new("UPLOAD /Reports", "whatsapp:+1", "SM3")
            .with_attachment(Attachment::new("https://media.example/ME2"));

        let err = handler.execute(&args(&["/Reports", ""]), &message).await.unwrap_err();
        assert!(matches!(err, HandlerError::MissingArgument("filename")));
        assert!(drive.calls().is_empty());
    }
}
