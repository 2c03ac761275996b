//! Console adapter for development/testing

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::application::errors::BotError;
use crate::application::messaging::CommandDispatcher;
use crate::domain::entities::InboundMessage;

/// Feeds lines typed on stdin through the dispatcher, one message per line
pub struct ConsoleAdapter {
    dispatcher: Arc<CommandDispatcher>,
    sender: String,
}

impl ConsoleAdapter {
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            dispatcher,
            sender: "console".to_string(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Dispatch a single command and return the reply
    pub async fn execute(&self, body: &str) -> String {
        let mut message = InboundMessage::from_console(body);
        message.sender = self.sender.clone();
        self.dispatcher.process(&message).await
    }

    /// Read commands from stdin until EOF or `quit`
    pub async fn run(&self) -> Result<(), BotError> {
        tracing::info!("Starting console (dev mode), type 'quit' to exit");
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with(stdin, tokio::io::stdout()).await
    }

    async fn run_with<R, W>(&self, input: R, mut output: W) -> Result<(), BotError>
    where
        R: tokio::io::AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("quit") {
                break;
            }

            let reply = self.execute(line).await;
            output.write_all(format!("[BOT] {}\n", reply).as_bytes()).await?;
            output.flush().await?;
        }
        Ok(())
    }
}
