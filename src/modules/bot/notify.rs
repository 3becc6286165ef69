use crate::common::error::PipelineError;
use crate::infrastructure::storage::ObjectMetadata;
use crate::modules::conversion::job::CHAT_ID_KEY;

/// A completion message addressed to the chat that requested the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient_id: String,
    pub message: String,
}

impl Notification {
    /// Builds the notice for a stored object from its metadata.
    pub fn for_object(
        bucket: &str,
        key: &str,
        metadata: &ObjectMetadata,
        storage_domain: &str,
    ) -> Result<Self, PipelineError> {
        let recipient_id = metadata
            .get(CHAT_ID_KEY)
            .ok_or(PipelineError::MissingRecipient)?;

        Ok(Self {
            recipient_id: recipient_id.clone(),
            message: object_url(bucket, key, storage_domain),
        })
    }
}

/// Virtual-hosted style URL of a public object.
pub fn object_url(bucket: &str, key: &str, storage_domain: &str) -> String {
    format!("https://{}.{}/{}", bucket, storage_domain, key)
}
