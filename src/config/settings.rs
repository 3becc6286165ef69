use crate::config::env::{self, EnvKey};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_STORAGE_DOMAIN: &str = "s3.amazonaws.com";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
#[error("missing required environment variable {0}")]
pub struct ConfigError(pub &'static str);

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub input_bucket: String,
    pub output_bucket: String,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub aws_access_key: String,
    pub aws_secret_key: String,
    pub aws_session_token: Option<String>,
    pub storage_domain: String,
    pub telegram_token: String,
    pub telegram_api_url: String,
    pub bot_username: Option<String>,
    pub webhook_secret: Option<String>,
    pub public_base_url: Option<String>,
    pub ffmpeg_path: String,
    pub temp_dir: PathBuf,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            input_bucket: required(EnvKey::InputBucket)?,
            output_bucket: required(EnvKey::OutputBucket)?,
            s3_endpoint: env::get_opt(EnvKey::S3Endpoint),
            s3_region: env::get_or(EnvKey::S3Region, "us-east-1"),
            aws_access_key: required(EnvKey::AwsAccessKey)?,
            aws_secret_key: required(EnvKey::AwsSecretKey)?,
            aws_session_token: env::get_opt(EnvKey::AwsSessionToken),
            storage_domain: env::get_or(EnvKey::StorageDomain, DEFAULT_STORAGE_DOMAIN),
            telegram_token: required(EnvKey::TelegramToken)?,
            telegram_api_url: env::get_or(EnvKey::TelegramApiUrl, DEFAULT_TELEGRAM_API_URL),
            bot_username: env::get_opt(EnvKey::BotUsername),
            webhook_secret: env::get_opt(EnvKey::WebhookSecret),
            public_base_url: env::get_opt(EnvKey::PublicBaseUrl),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            temp_dir: env::get_opt(EnvKey::TempDir)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        })
    }
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    env::get_opt(key).ok_or(ConfigError(name))
}

#[cfg(test)]
impl AppConfig {
    /// Config pointing at fixed test buckets and a caller-provided scratch dir.
    pub fn for_tests(temp_dir: PathBuf) -> Self {
        Self {
            server_port: 0,
            input_bucket: "media-input".to_string(),
            output_bucket: "media-output".to_string(),
            s3_endpoint: None,
            s3_region: "us-east-1".to_string(),
            aws_access_key: "test".to_string(),
            aws_secret_key: "test".to_string(),
            aws_session_token: None,
            storage_domain: DEFAULT_STORAGE_DOMAIN.to_string(),
            telegram_token: "123:abc".to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            bot_username: Some("converter_bot".to_string()),
            webhook_secret: None,
            public_base_url: None,
            ffmpeg_path: "ffmpeg".to_string(),
            temp_dir,
        }
    }
}
