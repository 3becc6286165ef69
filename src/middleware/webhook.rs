use crate::common::response::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Rejects webhook calls that do not carry the configured secret token.
/// Without a configured secret every call is let through.
pub async fn secret_token_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = &state.config.webhook_secret {
        let authorized = req
            .headers()
            .get(SECRET_TOKEN_HEADER)
            .is_some_and(|value| bool::from(value.as_bytes().ct_eq(expected.as_bytes())));

        if !authorized {
            return Err(ApiError(
                "Unauthorized: Missing or invalid webhook secret".to_string(),
                StatusCode::UNAUTHORIZED,
            ));
        }
    }

    Ok(next.run(req).await)
}
