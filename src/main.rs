use anyhow::Context;
use dotenvy::dotenv;
use media_converter::app;
use media_converter::config::settings::AppConfig;
use media_converter::infrastructure::storage::s3::StorageService;
use media_converter::infrastructure::telegram::client::TelegramService;
use media_converter::infrastructure::transcoder::ffmpeg::FfmpegTranscoder;
use media_converter::state::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("failed to load configuration")?;
    let storage = Arc::new(StorageService::new(&config));
    let chat = Arc::new(TelegramService::new(&config.telegram_api_url, &config.telegram_token));
    let transcoder = Arc::new(FfmpegTranscoder::new(&config.ffmpeg_path));

    let port = config.server_port;
    let state = AppState::new(config, storage, chat, transcoder);
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
