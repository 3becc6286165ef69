use crate::state::AppState;
use axum::middleware;
use axum::routing::post;
use axum::Router;

pub mod dto;
pub mod handler;
pub mod intake;
pub mod notify;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    let webhook_routes = Router::new()
        .route("/bot/webhook", post(handler::webhook))
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::webhook::secret_token_guard,
        ));

    Router::new()
        .route("/bot/set-webhook", post(handler::set_webhook))
        .route("/events/converted", post(handler::converted_event))
        .merge(webhook_routes)
}
