use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

// Events and updates are small JSON documents; media never travels through here.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn create_app(state: AppState) -> Router {
    crate::routes::configure_routes(state.clone())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::AppConfig;
    use crate::infrastructure::storage::memory::MemoryStorage;
    use crate::infrastructure::telegram::MockChatGateway;
    use crate::infrastructure::transcoder::MockTranscoder;
    use crate::middleware::webhook::SECRET_TOKEN_HEADER;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mockall::predicate::eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        storage: Arc<MemoryStorage>,
        _temp_root: TempDir,
    }

    fn harness(
        storage: MemoryStorage,
        chat: MockChatGateway,
        transcoder: MockTranscoder,
        configure: impl FnOnce(&mut AppConfig),
    ) -> Harness {
        let temp_root = TempDir::new().unwrap();
        let mut config = AppConfig::for_tests(temp_root.path().to_path_buf());
        configure(&mut config);
        let storage = Arc::new(storage);
        let state = AppState::new(config, storage.clone(), Arc::new(chat), Arc::new(transcoder));

        Harness {
            app: create_app(state),
            storage,
            _temp_root: temp_root,
        }
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let h = harness(MemoryStorage::default(), MockChatGateway::new(), MockTranscoder::new(), |_| {});

        let response = h
            .app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn storage_event_converts_upload() {
        let storage = MemoryStorage::default().with_object(
            "in",
            "a.mov",
            b"mov",
            &[("input-format", "mov"), ("target-format", "mp4")],
        );
        let mut transcoder = MockTranscoder::new();
        transcoder.expect_transcode().times(1).returning(|_, output| {
            std::fs::write(output, b"mp4").unwrap();
            Ok(())
        });
        let h = harness(storage, MockChatGateway::new(), transcoder, |_| {});

        let event = json!({
            "Records": [{ "s3": { "bucket": { "name": "in" }, "object": { "key": "a.mov" } } }]
        });
        let response = h.app.oneshot(post("/api/v1/events/storage", event.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["received"], 1);
        let key = body["data"]["converted"][0].as_str().unwrap().to_string();
        assert!(key.ends_with(".mp4"));

        let uploads = h.storage.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].bucket, "media-output");
        assert_eq!(uploads[0].key, key);
    }

    #[tokio::test]
    async fn storage_event_transcode_failure_is_a_server_error() {
        let storage = MemoryStorage::default().with_object(
            "in",
            "a.mov",
            b"mov",
            &[("input-format", "mov"), ("target-format", "mp4")],
        );
        let mut transcoder = MockTranscoder::new();
        transcoder.expect_transcode().returning(|_, _| Ok(()));
        let h = harness(storage, MockChatGateway::new(), transcoder, |_| {});

        let event = json!({
            "Records": [{ "s3": { "bucket": { "name": "in" }, "object": { "key": "a.mov" } } }]
        });
        let response = h.app.oneshot(post("/api/v1/events/storage", event.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn storage_event_rejects_non_json() {
        let h = harness(MemoryStorage::default(), MockChatGateway::new(), MockTranscoder::new(), |_| {});

        let response = h.app.oneshot(post("/api/v1/events/storage", "not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn webhook_start_greets_without_storing() {
        let mut chat = MockChatGateway::new();
        chat.expect_send_message()
            .with(eq("42"), eq("Beep boop"))
            .times(1)
            .returning(|_, _| Ok(()));
        let h = harness(MemoryStorage::default(), chat, MockTranscoder::new(), |_| {});

        let update = json!({
            "update_id": 1,
            "message": { "message_id": 1, "chat": { "id": 42 }, "text": "/start" }
        });
        let response = h.app.oneshot(post("/api/v1/bot/webhook", update.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "ok");
        assert!(h.storage.uploads().is_empty());
    }

    #[tokio::test]
    async fn webhook_without_body_is_a_bad_request() {
        let h = harness(MemoryStorage::default(), MockChatGateway::new(), MockTranscoder::new(), |_| {});

        let response = h.app.oneshot(post("/api/v1/bot/webhook", Body::empty())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "Oops, something went wrong!");
    }

    #[tokio::test]
    async fn webhook_secret_is_enforced() {
        let mut chat = MockChatGateway::new();
        chat.expect_send_message().times(1).returning(|_, _| Ok(()));
        let h = harness(MemoryStorage::default(), chat, MockTranscoder::new(), |config| {
            config.webhook_secret = Some("s3cret".to_string());
        });
        let update = json!({
            "update_id": 1,
            "message": { "message_id": 1, "chat": { "id": 42 }, "text": "/start" }
        })
        .to_string();

        let denied = h
            .app
            .clone()
            .oneshot(post("/api/v1/bot/webhook", update.clone()))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let mut request = post("/api/v1/bot/webhook", update);
        request
            .headers_mut()
            .insert(SECRET_TOKEN_HEADER, "s3cret".parse().unwrap());
        let allowed = h.app.oneshot(request).await.unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn webhook_secret_must_match_exactly() {
        let mut chat = MockChatGateway::new();
        chat.expect_send_message().never();
        let h = harness(MemoryStorage::default(), chat, MockTranscoder::new(), |config| {
            config.webhook_secret = Some("s3cret".to_string());
        });
        let update = json!({
            "update_id": 1,
            "message": { "message_id": 1, "chat": { "id": 42 }, "text": "/start" }
        })
        .to_string();

        for presented in ["s3creT", "s3cre", "s3cret "] {
            let mut request = post("/api/v1/bot/webhook", update.clone());
            request
                .headers_mut()
                .insert(SECRET_TOKEN_HEADER, presented.parse().unwrap());
            let response = h.app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{presented:?}");
        }
    }

    #[tokio::test]
    async fn set_webhook_uses_host_header_and_secret() {
        let mut chat = MockChatGateway::new();
        chat.expect_set_webhook()
            .with(
                eq("https://bot.example.com/api/v1/bot/webhook"),
                eq(Some("s3cret".to_string())),
            )
            .times(1)
            .returning(|_, _| Ok(true));
        let h = harness(MemoryStorage::default(), chat, MockTranscoder::new(), |config| {
            config.webhook_secret = Some("s3cret".to_string());
        });

        let request = Request::post("/api/v1/bot/set-webhook")
            .header("host", "bot.example.com")
            .body(Body::empty())
            .unwrap();
        let response = h.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["data"]["url"],
            "https://bot.example.com/api/v1/bot/webhook"
        );
    }

    #[tokio::test]
    async fn set_webhook_declined_is_a_bad_request() {
        let mut chat = MockChatGateway::new();
        chat.expect_set_webhook().returning(|_, _| Ok(false));
        let h = harness(MemoryStorage::default(), chat, MockTranscoder::new(), |config| {
            config.public_base_url = Some("https://gw.example.com/prod".to_string());
        });

        let response = h
            .app
            .oneshot(Request::post("/api/v1/bot/set-webhook").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn converted_event_notifies_requester() {
        let storage = MemoryStorage::default().with_object("media-output", "abc.mp4", b"", &[("chat-id", "42")]);
        let mut chat = MockChatGateway::new();
        chat.expect_send_message()
            .with(eq("42"), eq("https://media-output.s3.amazonaws.com/abc.mp4"))
            .times(1)
            .returning(|_, _| Ok(()));
        let h = harness(storage, chat, MockTranscoder::new(), |_| {});

        let event = json!({
            "Records": [{ "s3": { "bucket": { "name": "media-output" }, "object": { "key": "abc.mp4" } } }]
        });
        let response = h.app.oneshot(post("/api/v1/events/converted", event.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"]["notified"], 1);
    }
}
