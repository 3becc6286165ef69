use serde::Serialize;
use utoipa::ToSchema;

/// Outcome of one storage notification.
#[derive(Debug, Default, Serialize, ToSchema, PartialEq, Eq)]
pub struct ConversionReport {
    /// Records in the event, malformed ones included.
    pub received: usize,
    /// Keys written to the output bucket.
    pub converted: Vec<String>,
    /// Records dropped: malformed, missing, invalid metadata or an
    /// unsupported conversion.
    pub skipped: usize,
}
