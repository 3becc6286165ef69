use super::formats::{FormatRegistry, VIDEO};
use super::job::JobDescriptor;
use crate::common::error::PipelineError;
use crate::infrastructure::storage::{NewObject, OBJECT_RETENTION, ObjectMetadata, StorageAccessor};
use crate::infrastructure::transcoder::Transcoder;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

/// Converts a local source file of one family into `output`.
#[async_trait]
pub trait FamilyHandler: Send + Sync {
    async fn convert(&self, source: &Path, output: &Path) -> Result<(), PipelineError>;
}

pub struct VideoHandler {
    transcoder: Arc<dyn Transcoder>,
}

impl VideoHandler {
    pub fn new(transcoder: Arc<dyn Transcoder>) -> Self {
        Self { transcoder }
    }
}

#[async_trait]
impl FamilyHandler for VideoHandler {
    async fn convert(&self, source: &Path, output: &Path) -> Result<(), PipelineError> {
        self.transcoder
            .transcode(source, output)
            .await
            .map_err(|e| PipelineError::TranscodeFailed(e.to_string()))
    }
}

/// The result of one conversion, ready to be written to the output bucket.
#[derive(Debug, Clone)]
pub struct OutputDescriptor {
    pub destination_bucket: String,
    pub destination_key: String,
    pub body: Bytes,
    pub carried_metadata: ObjectMetadata,
    pub expires: OffsetDateTime,
}

impl OutputDescriptor {
    /// Converted objects are published world-readable so the link sent to the user works.
    pub fn into_new_object(self) -> NewObject {
        let content_type = NewObject::content_type_for(&self.destination_key);
        NewObject {
            bucket: self.destination_bucket,
            key: self.destination_key,
            body: self.body.into(),
            metadata: self.carried_metadata,
            expires: self.expires,
            content_type,
            public_read: true,
        }
    }
}

pub struct Dispatcher {
    registry: Arc<FormatRegistry>,
    storage: Arc<dyn StorageAccessor>,
    handlers: HashMap<String, Arc<dyn FamilyHandler>>,
    output_bucket: String,
    temp_root: PathBuf,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<FormatRegistry>,
        storage: Arc<dyn StorageAccessor>,
        output_bucket: &str,
        temp_root: PathBuf,
    ) -> Self {
        Self {
            registry,
            storage,
            handlers: HashMap::new(),
            output_bucket: output_bucket.to_string(),
            temp_root,
        }
    }

    /// Dispatcher with the video handler backed by `transcoder`.
    pub fn with_video(
        registry: Arc<FormatRegistry>,
        storage: Arc<dyn StorageAccessor>,
        transcoder: Arc<dyn Transcoder>,
        output_bucket: &str,
        temp_root: PathBuf,
    ) -> Self {
        Self::new(registry, storage, output_bucket, temp_root)
            .with_handler(VIDEO, Arc::new(VideoHandler::new(transcoder)))
    }

    pub fn with_handler(mut self, family: &str, handler: Arc<dyn FamilyHandler>) -> Self {
        self.handlers.insert(family.to_string(), handler);
        self
    }

    /// Runs `job` through its family handler.
    ///
    /// Returns `Ok(None)` when no handler exists for the job's formats. All
    /// scratch files live in one temporary directory that is removed on every
    /// exit path.
    pub async fn dispatch(&self, job: JobDescriptor) -> Result<Option<OutputDescriptor>, PipelineError> {
        let Some(family) = self.registry.shared_family(&job.input_format, &job.target_format) else {
            debug!(input = %job.input_format, target = %job.target_format, "No shared family, dropping job");
            return Ok(None);
        };
        let Some(handler) = self.handlers.get(family) else {
            debug!(family, "No handler for family, dropping job");
            return Ok(None);
        };

        let workdir = tempfile::Builder::new()
            .prefix("convert-")
            .tempdir_in(&self.temp_root)?;

        let source_path = workdir
            .path()
            .join(format!("{}.{}", Uuid::new_v4(), job.input_format));
        let source = self.storage.download(&job.source_bucket, &job.source_key).await?;
        tokio::fs::write(&source_path, &source).await?;

        let output_key = format!("{}.{}", Uuid::new_v4(), job.target_format);
        let output_path = workdir.path().join(&output_key);

        info!(
            bucket = %job.source_bucket,
            key = %job.source_key,
            family,
            target = %job.target_format,
            "Converting object"
        );
        handler.convert(&source_path, &output_path).await?;

        let body = match tokio::fs::read(&output_path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PipelineError::TranscodeFailed(format!(
                    "no output produced for {}",
                    job.source_key
                )));
            }
            Err(e) => return Err(e.into()),
        };
        workdir.close()?;

        Ok(Some(OutputDescriptor {
            destination_bucket: self.output_bucket.clone(),
            destination_key: output_key,
            body: Bytes::from(body),
            carried_metadata: job.correlation_metadata,
            expires: OffsetDateTime::now_utc() + OBJECT_RETENTION,
        }))
    }
}
