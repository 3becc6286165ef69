use crate::infrastructure::storage::StorageError;
use crate::infrastructure::telegram::ChatError;
use thiserror::Error;

/// Everything that can stop a trigger entry, a job or a notification.
///
/// Only [`PipelineError::TranscodeFailed`] and the infrastructure variants are
/// surfaced to the caller as a failed invocation; the rest are skip reasons
/// that get logged while the batch carries on.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("not a recognized storage trigger")]
    NotARecognizedTrigger,

    #[error("invalid {field} metadata")]
    InvalidMetadata {
        field: &'static str,
        value: Option<String>,
    },

    #[error("no shared family for {input} -> {target}")]
    UnsupportedFamily { input: String, target: String },

    #[error("transcode failed: {0}")]
    TranscodeFailed(String),

    #[error("missing chat-id metadata")]
    MissingRecipient,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// True for conditions the batch skips over instead of failing on.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            PipelineError::NotARecognizedTrigger
                | PipelineError::InvalidMetadata { .. }
                | PipelineError::UnsupportedFamily { .. }
                | PipelineError::MissingRecipient
        )
    }
}
