use super::dto::{NotificationReport, Update, WebhookResponse};
use crate::common::response::{ApiError, ApiResponse, ApiSuccess, GENERIC_ERROR_MESSAGE};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

pub const WEBHOOK_PATH: &str = "/api/v1/bot/webhook";

/// Receive a chat update
#[utoipa::path(
    post,
    path = "/api/v1/bot/webhook",
    request_body(content = Object, description = "Bot API Update", content_type = "application/json"),
    responses(
        (status = 200, description = "Update handled", body = ApiResponse<String>),
        (status = 400, description = "Missing or malformed update"),
        (status = 401, description = "Wrong webhook secret"),
        (status = 500, description = "Chat or storage failure")
    ),
    tag = "Bot"
)]
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Rejected update body: {}", e);
            return ApiError(GENERIC_ERROR_MESSAGE.to_string(), StatusCode::BAD_REQUEST).into_response();
        }
    };

    match state.bot.handle_update(&update).await {
        Ok(_) => ApiSuccess(ApiResponse::ok(), StatusCode::OK).into_response(),
        Err(e) => {
            error!(update_id = update.update_id, "Update failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Register this service as the bot's webhook
#[utoipa::path(
    post,
    path = "/api/v1/bot/set-webhook",
    responses(
        (status = 200, description = "Webhook registered", body = ApiResponse<WebhookResponse>),
        (status = 400, description = "No public URL or the chat API declined"),
        (status = 500, description = "Chat API failure")
    ),
    tag = "Bot"
)]
pub async fn set_webhook(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let base = match &state.config.public_base_url {
        Some(base) => base.clone(),
        None => match headers.get(header::HOST).and_then(|host| host.to_str().ok()) {
            Some(host) => format!("https://{}", host),
            None => {
                return ApiError("Cannot determine public URL".to_string(), StatusCode::BAD_REQUEST).into_response();
            }
        },
    };

    let url = match webhook_url(&base) {
        Ok(url) => url,
        Err(e) => {
            return ApiError(format!("Invalid public URL {}: {}", base, e), StatusCode::BAD_REQUEST).into_response();
        }
    };

    match state
        .bot
        .register_webhook(url.as_str(), state.config.webhook_secret.clone())
        .await
    {
        Ok(true) => {
            info!(url = %url, "Webhook set");
            ApiSuccess(
                ApiResponse::success(WebhookResponse { url: url.to_string() }, "Webhook registered"),
                StatusCode::OK,
            )
            .into_response()
        }
        Ok(false) => ApiError(GENERIC_ERROR_MESSAGE.to_string(), StatusCode::BAD_REQUEST).into_response(),
        Err(e) => {
            error!("Webhook registration failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Notify requesters about converted objects
#[utoipa::path(
    post,
    path = "/api/v1/events/converted",
    request_body(content = Object, description = "S3 event notification for the output bucket", content_type = "application/json"),
    responses(
        (status = 200, description = "Event processed", body = ApiResponse<NotificationReport>),
        (status = 400, description = "Body is not JSON"),
        (status = 500, description = "Chat or storage failure")
    ),
    tag = "Bot"
)]
pub async fn converted_event(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Rejected storage event body: {}", e);
            return ApiError("Invalid event payload".to_string(), StatusCode::BAD_REQUEST).into_response();
        }
    };

    match state.bot.notify_completed(&event).await {
        Ok(report) => ApiSuccess(ApiResponse::success(report, "Notifications sent"), StatusCode::OK).into_response(),
        Err(e) => {
            error!("Completion event failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// `base` may carry a path prefix (e.g. an API gateway stage); the webhook path is appended to it.
pub fn webhook_url(base: &str) -> Result<Url, url::ParseError> {
    let mut base = base.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)?.join(WEBHOOK_PATH.trim_start_matches('/'))
}
