use super::formats::FormatRegistry;
use super::trigger::TriggerEntry;
use crate::common::error::PipelineError;
use crate::infrastructure::storage::ObjectMetadata;

pub const INPUT_FORMAT_KEY: &str = "input-format";
pub const TARGET_FORMAT_KEY: &str = "target-format";
pub const CHAT_ID_KEY: &str = "chat-id";

/// A validated conversion request for one uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub source_bucket: String,
    pub source_key: String,
    pub input_format: String,
    pub target_format: String,
    pub family: String,
    /// The object's full metadata, carried through to the output untouched.
    pub correlation_metadata: ObjectMetadata,
}

impl JobDescriptor {
    /// Validates `metadata` for `entry`. Values are matched literally against
    /// the registry, and both formats must belong to the same family.
    pub fn build(
        registry: &FormatRegistry,
        entry: &TriggerEntry,
        metadata: ObjectMetadata,
    ) -> Result<Self, PipelineError> {
        let input = metadata.get(INPUT_FORMAT_KEY).map(String::as_str);
        let input = match input {
            Some(token) if registry.accepts_input(token) => token,
            other => {
                return Err(PipelineError::InvalidMetadata {
                    field: INPUT_FORMAT_KEY,
                    value: other.map(str::to_string),
                });
            }
        };

        let target = metadata.get(TARGET_FORMAT_KEY).map(String::as_str);
        let target = match target {
            Some(token) if registry.accepts_target(token) => token,
            other => {
                return Err(PipelineError::InvalidMetadata {
                    field: TARGET_FORMAT_KEY,
                    value: other.map(str::to_string),
                });
            }
        };

        let family = registry
            .shared_family(input, target)
            .ok_or_else(|| PipelineError::UnsupportedFamily {
                input: input.to_string(),
                target: target.to_string(),
            })?
            .to_string();

        Ok(Self {
            source_bucket: entry.bucket.clone(),
            source_key: entry.key.clone(),
            input_format: input.to_string(),
            target_format: target.to_string(),
            family,
            correlation_metadata: metadata,
        })
    }
}
