use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub mod client;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat API rejected {method}: {description}")]
    Api { method: &'static str, description: String },

    #[error("file {0} has no downloadable path")]
    MissingFilePath(String),

    #[error("failed to write attachment: {0}")]
    Io(#[from] std::io::Error),
}

/// Outbound side of the chat bot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ChatError>;

    /// Resolves an attachment id and streams its content into `dest`.
    /// Returns the number of bytes written.
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64, ChatError>;

    /// Points the bot's update delivery at `url`. Returns the API's verdict.
    async fn set_webhook(&self, url: &str, secret_token: Option<String>) -> Result<bool, ChatError>;
}
