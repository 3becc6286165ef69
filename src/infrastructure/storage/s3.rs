use super::{NewObject, ObjectBody, ObjectMetadata, StorageAccessor, StorageError};
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use tracing::{error, info};

use crate::config::settings::AppConfig;

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
}

impl StorageService {
    pub fn new(config: &AppConfig) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key,
            &config.aws_secret_key,
            config.aws_session_token.clone(),
            None,
            "environment",
        );

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials);

        // Custom endpoints are MinIO-style and need path addressing.
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        info!(
            region = %config.s3_region,
            endpoint = config.s3_endpoint.as_deref().unwrap_or("aws"),
            "S3 client configured"
        );

        Self { client }
    }
}

fn not_found(bucket: &str, key: &str) -> StorageError {
    StorageError::NotFound {
        bucket: bucket.to_string(),
        key: key.to_string(),
    }
}

fn request_failed<E, R>(err: &SdkError<E, R>, bucket: &str, key: &str, op: &str) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(err).to_string();
    error!(bucket = %bucket, key = %key, error = %message, "S3 {} failed", op);
    StorageError::Request(message)
}

#[async_trait]
impl StorageAccessor for StorageService {
    async fn get_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StorageError> {
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err)
                    if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
                {
                    not_found(bucket, key)
                }
                _ => request_failed(&e, bucket, key, "head_object"),
            })?;

        Ok(output
            .metadata()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err)
                    if matches!(service_err.err(), GetObjectError::NoSuchKey(_)) =>
                {
                    not_found(bucket, key)
                }
                _ => request_failed(&e, bucket, key, "get_object"),
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Request(format!("failed to read {}/{}: {}", bucket, key, e)))?;

        let bytes = data.into_bytes();
        info!(bucket = %bucket, key = %key, size_bytes = bytes.len(), "Downloaded object");
        Ok(bytes)
    }

    async fn upload(&self, object: NewObject) -> Result<(), StorageError> {
        let expires = DateTime::from_secs(object.expires.unix_timestamp());
        let body = match object.body {
            ObjectBody::Bytes(bytes) => ByteStream::from(bytes),
            ObjectBody::File(path) => ByteStream::from_path(&path).await.map_err(|e| {
                StorageError::Request(format!("failed to open {}: {}", path.display(), e))
            })?,
        };
        let size = body.size_hint().1;

        let mut request = self
            .client
            .put_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .body(body)
            .content_type(&object.content_type)
            .expires(expires)
            .set_metadata(Some(object.metadata.into_iter().collect()));

        if object.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request
            .send()
            .await
            .map_err(|e| request_failed(&e, &object.bucket, &object.key, "put_object"))?;

        info!(bucket = %object.bucket, key = %object.key, size_bytes = ?size, "Uploaded object");
        Ok(())
    }
}
