use super::dto::ConversionReport;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::Value;
use tracing::{error, warn};

/// Convert objects announced by a storage notification
#[utoipa::path(
    post,
    path = "/api/v1/events/storage",
    request_body(content = Object, description = "S3 event notification", content_type = "application/json"),
    responses(
        (status = 200, description = "Event processed", body = ApiResponse<ConversionReport>),
        (status = 400, description = "Body is not JSON"),
        (status = 500, description = "Conversion or storage failure")
    ),
    tag = "Conversion"
)]
pub async fn storage_event(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Rejected storage event body: {}", e);
            return ApiError("Invalid event payload".to_string(), StatusCode::BAD_REQUEST).into_response();
        }
    };

    match state.converter.handle_event(&event).await {
        Ok(report) => ApiSuccess(ApiResponse::success(report, "Storage event processed"), StatusCode::OK).into_response(),
        Err(e) => {
            error!("Storage event failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
