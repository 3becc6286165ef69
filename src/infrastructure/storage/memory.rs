//! In-memory [`StorageAccessor`] used by unit tests.

use super::{NewObject, ObjectBody, ObjectMetadata, StorageAccessor, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), (Bytes, ObjectMetadata)>>,
    uploads: Mutex<Vec<NewObject>>,
}

impl MemoryStorage {
    pub fn with_object(self, bucket: &str, key: &str, body: &[u8], metadata: &[(&str, &str)]) -> Self {
        let metadata = metadata
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), (Bytes::copy_from_slice(body), metadata));
        self
    }

    /// Every object written through [`StorageAccessor::upload`], in order,
    /// with file bodies read in.
    pub fn uploads(&self) -> Vec<NewObject> {
        self.uploads.lock().unwrap().clone()
    }

    fn lookup(&self, bucket: &str, key: &str) -> Result<(Bytes, ObjectMetadata), StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

#[async_trait]
impl StorageAccessor for MemoryStorage {
    async fn get_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StorageError> {
        self.lookup(bucket, key).map(|(_, metadata)| metadata)
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        self.lookup(bucket, key).map(|(body, _)| body)
    }

    async fn upload(&self, mut object: NewObject) -> Result<(), StorageError> {
        let body = match &object.body {
            ObjectBody::Bytes(bytes) => bytes.clone(),
            ObjectBody::File(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| StorageError::Request(e.to_string()))?,
        };
        object.body = ObjectBody::Bytes(body.clone());

        self.objects.lock().unwrap().insert(
            (object.bucket.clone(), object.key.clone()),
            (body, object.metadata.clone()),
        );
        self.uploads.lock().unwrap().push(object);
        Ok(())
    }
}

impl ObjectBody {
    /// Recorded upload content; file bodies are resolved when uploaded.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            ObjectBody::Bytes(bytes) => bytes,
            ObjectBody::File(path) => panic!("unresolved file body {}", path.display()),
        }
    }
}
