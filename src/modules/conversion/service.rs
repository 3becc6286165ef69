use super::dispatcher::Dispatcher;
use super::dto::ConversionReport;
use super::formats::FormatRegistry;
use super::job::JobDescriptor;
use super::trigger::{self, TriggerEntry};
use crate::common::error::PipelineError;
use crate::infrastructure::storage::{StorageAccessor, StorageError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ConversionService {
    registry: Arc<FormatRegistry>,
    storage: Arc<dyn StorageAccessor>,
    dispatcher: Dispatcher,
}

impl ConversionService {
    pub fn new(
        registry: Arc<FormatRegistry>,
        storage: Arc<dyn StorageAccessor>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            registry,
            storage,
            dispatcher,
        }
    }

    /// Converts every valid object referenced by a storage notification.
    ///
    /// Malformed records, vanished objects and invalid entries are logged and
    /// skipped. A transcoder or storage failure aborts the batch so the caller
    /// can report it.
    pub async fn handle_event(&self, event: &Value) -> Result<ConversionReport, PipelineError> {
        let mut report = ConversionReport::default();

        if !trigger::is_storage_notification(event) {
            info!("{}", PipelineError::NotARecognizedTrigger);
            return Ok(report);
        }

        let mut entries = trigger::classify(event);
        for entry in entries.by_ref() {
            report.received += 1;
            match self.process_entry(&entry).await {
                Ok(Some(key)) => report.converted.push(key),
                Ok(None) => report.skipped += 1,
                Err(err @ PipelineError::UnsupportedFamily { .. }) => {
                    debug!(bucket = %entry.bucket, key = %entry.key, "{}", err);
                    report.skipped += 1;
                }
                Err(PipelineError::Storage(err @ StorageError::NotFound { .. })) => {
                    info!("{}... Skipping", err);
                    report.skipped += 1;
                }
                Err(err) if err.is_skip() => {
                    info!(bucket = %entry.bucket, key = %entry.key, "{}... Skipping", err);
                    report.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        report.received += entries.skipped();
        report.skipped += entries.skipped();

        info!(
            received = report.received,
            converted = report.converted.len(),
            skipped = report.skipped,
            "Storage event processed"
        );
        Ok(report)
    }

    async fn process_entry(&self, entry: &TriggerEntry) -> Result<Option<String>, PipelineError> {
        let metadata = self.storage.get_metadata(&entry.bucket, &entry.key).await?;
        let job = JobDescriptor::build(&self.registry, entry, metadata)?;

        let Some(output) = self.dispatcher.dispatch(job).await? else {
            return Ok(None);
        };

        let key = output.destination_key.clone();
        self.storage.upload(output.into_new_object()).await?;
        Ok(Some(key))
    }
}
