use super::dto::{NotificationReport, Update};
use super::intake::{self, Intake, GREETING, PROCESSING};
use super::notify::Notification;
use crate::common::error::PipelineError;
use crate::config::settings::AppConfig;
use crate::infrastructure::storage::{
    NewObject, OBJECT_RETENTION, ObjectBody, ObjectMetadata, StorageAccessor, StorageError,
};
use crate::infrastructure::telegram::{ChatError, ChatGateway};
use crate::modules::conversion::job::{CHAT_ID_KEY, INPUT_FORMAT_KEY, TARGET_FORMAT_KEY};
use crate::modules::conversion::trigger;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Chat uploads are always stored as QuickTime and converted to MP4.
pub const UPLOAD_INPUT_FORMAT: &str = "mov";
pub const UPLOAD_TARGET_FORMAT: &str = "mp4";

pub struct BotService {
    storage: Arc<dyn StorageAccessor>,
    chat: Arc<dyn ChatGateway>,
    bot_username: Option<String>,
    input_bucket: String,
    output_bucket: String,
    storage_domain: String,
    temp_root: PathBuf,
}

impl BotService {
    pub fn new(config: &AppConfig, storage: Arc<dyn StorageAccessor>, chat: Arc<dyn ChatGateway>) -> Self {
        Self {
            storage,
            chat,
            bot_username: config.bot_username.clone(),
            input_bucket: config.input_bucket.clone(),
            output_bucket: config.output_bucket.clone(),
            storage_domain: config.storage_domain.clone(),
            temp_root: config.temp_dir.clone(),
        }
    }

    /// Acts on one chat update and returns the decision taken.
    pub async fn handle_update(&self, update: &Update) -> Result<Intake, PipelineError> {
        let intake = intake::classify_update(update, self.bot_username.as_deref());

        match &intake {
            Intake::Start { chat_id } => {
                self.chat.send_message(&chat_id.to_string(), GREETING).await?;
            }
            Intake::Attachment { chat_id, file_id } => {
                self.chat.send_message(&chat_id.to_string(), PROCESSING).await?;
                let key = self.store_attachment(*chat_id, file_id).await?;
                info!(chat_id, key = %key, "Stored chat attachment");
            }
            Intake::Ignore => {
                info!(update_id = update.update_id, "Nothing to do for update");
            }
        }

        Ok(intake)
    }

    async fn store_attachment(&self, chat_id: i64, file_id: &str) -> Result<String, PipelineError> {
        let name = Uuid::new_v4();
        let key = format!("{}.{}", name, UPLOAD_INPUT_FORMAT);

        // Streamed to disk and uploaded from there; the guard deletes the
        // file however this returns.
        let staged = tempfile::Builder::new()
            .prefix(&name.to_string())
            .suffix(&format!(".{}", UPLOAD_INPUT_FORMAT))
            .rand_bytes(0)
            .tempfile_in(&self.temp_root)?;
        let size = self.chat.download_file(file_id, staged.path()).await?;
        debug!(file_id, size_bytes = size, "Staged chat attachment");

        let metadata = ObjectMetadata::from([
            (CHAT_ID_KEY.to_string(), chat_id.to_string()),
            (INPUT_FORMAT_KEY.to_string(), UPLOAD_INPUT_FORMAT.to_string()),
            (TARGET_FORMAT_KEY.to_string(), UPLOAD_TARGET_FORMAT.to_string()),
        ]);

        self.storage
            .upload(NewObject {
                bucket: self.input_bucket.clone(),
                content_type: NewObject::content_type_for(&key),
                key: key.clone(),
                body: ObjectBody::File(staged.path().to_path_buf()),
                metadata,
                expires: OffsetDateTime::now_utc() + OBJECT_RETENTION,
                public_read: false,
            })
            .await?;
        staged.close()?;

        Ok(key)
    }

    /// Tells each requester where their converted object can be fetched.
    ///
    /// Records that cannot be delivered (vanished object, no recipient, chat
    /// refusing the message) are logged and skipped; transport failures abort.
    pub async fn notify_completed(&self, event: &Value) -> Result<NotificationReport, PipelineError> {
        let mut report = NotificationReport::default();

        if !trigger::is_storage_notification(event) {
            info!("{}", PipelineError::NotARecognizedTrigger);
            return Ok(report);
        }

        let mut entries = trigger::classify(event);
        for entry in entries.by_ref() {
            report.received += 1;

            if entry.bucket != self.output_bucket {
                info!(bucket = %entry.bucket, "Not an output bucket invocation... Skipping");
                report.skipped += 1;
                continue;
            }

            let metadata = match self.storage.get_metadata(&entry.bucket, &entry.key).await {
                Ok(metadata) => metadata,
                Err(err @ StorageError::NotFound { .. }) => {
                    info!("{}... Skipping", err);
                    report.skipped += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let notification =
                match Notification::for_object(&entry.bucket, &entry.key, &metadata, &self.storage_domain) {
                    Ok(notification) => notification,
                    Err(err) => {
                        info!(bucket = %entry.bucket, key = %entry.key, "{}... Skipping", err);
                        report.skipped += 1;
                        continue;
                    }
                };

            match self
                .chat
                .send_message(&notification.recipient_id, &notification.message)
                .await
            {
                Ok(()) => report.notified += 1,
                Err(err @ ChatError::Api { .. }) => {
                    warn!(chat_id = %notification.recipient_id, key = %entry.key, "{}... Skipping", err);
                    report.skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        report.received += entries.skipped();
        report.skipped += entries.skipped();

        Ok(report)
    }

    /// Registers `url` as the update webhook.
    pub async fn register_webhook(&self, url: &str, secret: Option<String>) -> Result<bool, PipelineError> {
        Ok(self.chat.set_webhook(url, secret).await?)
    }
}
