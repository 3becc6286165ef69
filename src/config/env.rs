use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    InputBucket,
    OutputBucket,
    S3Endpoint,
    S3Region,
    AwsAccessKey,
    AwsSecretKey,
    AwsSessionToken,
    StorageDomain,
    TelegramToken,
    TelegramApiUrl,
    BotUsername,
    WebhookSecret,
    PublicBaseUrl,
    FfmpegPath,
    TempDir,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::InputBucket => "INPUT_BUCKET_NAME",
            EnvKey::OutputBucket => "OUTPUT_BUCKET_NAME",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3Region => "S3_REGION",
            EnvKey::AwsAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::AwsSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::AwsSessionToken => "AWS_SESSION_TOKEN",
            EnvKey::StorageDomain => "STORAGE_DOMAIN",
            EnvKey::TelegramToken => "TELEGRAM_TOKEN",
            EnvKey::TelegramApiUrl => "TELEGRAM_API_URL",
            EnvKey::BotUsername => "BOT_USERNAME",
            EnvKey::WebhookSecret => "TELEGRAM_WEBHOOK_SECRET",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::TempDir => "TEMP_DIR",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

/// Like [`get`], but treats an unset or blank variable as absent.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str())
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    get_opt(key).unwrap_or_else(|| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
