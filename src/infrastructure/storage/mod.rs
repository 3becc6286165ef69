use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

pub mod s3;

#[cfg(test)]
pub mod memory;

/// How long objects written by this service are kept around.
pub const OBJECT_RETENTION: Duration = Duration::hours(1);

/// User metadata attached to a stored object (`x-amz-meta-*`).
pub type ObjectMetadata = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("storage request failed: {0}")]
    Request(String),
}

/// Content of an object about to be written.
#[derive(Debug, Clone)]
pub enum ObjectBody {
    Bytes(Bytes),
    /// Streamed from a local file that must outlive the upload call.
    File(PathBuf),
}

impl From<Bytes> for ObjectBody {
    fn from(bytes: Bytes) -> Self {
        ObjectBody::Bytes(bytes)
    }
}

/// An object about to be written.
#[derive(Debug, Clone)]
pub struct NewObject {
    pub bucket: String,
    pub key: String,
    pub body: ObjectBody,
    pub metadata: ObjectMetadata,
    pub expires: OffsetDateTime,
    pub content_type: String,
    pub public_read: bool,
}

impl NewObject {
    /// Content type guessed from the key's extension.
    pub fn content_type_for(key: &str) -> String {
        mime_guess::from_path(key)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageAccessor: Send + Sync {
    async fn get_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StorageError>;

    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError>;

    async fn upload(&self, object: NewObject) -> Result<(), StorageError>;
}
