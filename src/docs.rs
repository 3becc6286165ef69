use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::conversion::handler::storage_event,
        crate::modules::bot::handler::converted_event,
        crate::modules::bot::handler::webhook,
        crate::modules::bot::handler::set_webhook,
    ),
    components(
        schemas(
            crate::modules::conversion::dto::ConversionReport,
            crate::modules::bot::dto::NotificationReport,
            crate::modules::bot::dto::WebhookResponse,
        )
    ),
    tags(
        (name = "Conversion", description = "Storage-triggered media conversion"),
        (name = "Bot", description = "Chat bot intake and completion notices")
    )
)]
pub struct ApiDoc;
