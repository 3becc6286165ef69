use super::{ChatError, ChatGateway};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Bot API client (`https://core.telegram.org/bots/api`).
#[derive(Clone)]
pub struct TelegramService {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteFile {
    file_id: String,
    file_path: Option<String>,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct GetFile<'a> {
    file_id: &'a str,
}

#[derive(Serialize)]
struct SetWebhook<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_token: Option<String>,
}

impl TelegramService {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_url, self.token, file_path)
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T, ChatError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method, "Calling Bot API");
        let response: BotApiResponse<T> = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        match response {
            BotApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            BotApiResponse { description, .. } => Err(ChatError::Api {
                method,
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

#[async_trait]
impl ChatGateway for TelegramService {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ChatError> {
        let _: serde_json::Value = self.call("sendMessage", &SendMessage { chat_id, text }).await?;
        info!(chat_id = %chat_id, "Sent chat message");
        Ok(())
    }

    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<u64, ChatError> {
        let remote: RemoteFile = self.call("getFile", &GetFile { file_id }).await?;
        let file_path = remote
            .file_path
            .ok_or_else(|| ChatError::MissingFilePath(remote.file_id.clone()))?;

        let mut stream = self
            .http
            .get(self.file_url(&file_path))
            .send()
            .await?
            .error_for_status()?
            .bytes_stream();

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        info!(file_id = %file_id, size_bytes = written, "Downloaded chat attachment");
        Ok(written)
    }

    async fn set_webhook(&self, url: &str, secret_token: Option<String>) -> Result<bool, ChatError> {
        let accepted: bool = self.call("setWebhook", &SetWebhook { url, secret_token }).await?;
        info!(url = %url, accepted, "Registered webhook");
        Ok(accepted)
    }
}
