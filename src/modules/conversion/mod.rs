use crate::state::AppState;
use axum::routing::post;
use axum::Router;

pub mod dispatcher;
pub mod dto;
pub mod formats;
pub mod handler;
pub mod job;
pub mod service;
pub mod trigger;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/storage", post(handler::storage_event))
}
