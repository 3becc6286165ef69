//! Extracts `(bucket, key)` pairs from storage notifications.
//!
//! Accepts the S3 event notification shape (also emitted by MinIO webhook
//! targets): `{"Records": [{"s3": {"bucket": {"name": ..}, "object": {"key": ..}}}]}`.

use serde_json::Value;
use std::slice;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEntry {
    pub bucket: String,
    pub key: String,
}

/// Whether `event` carries a `Records` array at all.
pub fn is_storage_notification(event: &Value) -> bool {
    records(event).is_some()
}

/// Lazily yields one entry per well-formed record. Records that are not S3
/// records, or lack a bucket name or object key, are logged and counted in
/// [`TriggerEntries::skipped`].
pub fn classify(event: &Value) -> TriggerEntries<'_> {
    TriggerEntries {
        records: records(event).unwrap_or_default().iter(),
        skipped: 0,
    }
}

fn records(event: &Value) -> Option<&[Value]> {
    event.get("Records")?.as_array().map(Vec::as_slice)
}

#[derive(Debug, Clone)]
pub struct TriggerEntries<'a> {
    records: slice::Iter<'a, Value>,
    skipped: usize,
}

impl TriggerEntries<'_> {
    /// Malformed records passed over so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for TriggerEntries<'_> {
    type Item = TriggerEntry;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            match entry_from_record(record) {
                Some(entry) => return Some(entry),
                None => {
                    self.skipped += 1;
                    info!("Not a S3 record... Skipping");
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.records.size_hint().1)
    }
}

fn entry_from_record(record: &Value) -> Option<TriggerEntry> {
    let s3 = record.get("s3")?;
    let bucket = s3.get("bucket")?.get("name")?.as_str()?;
    let key = s3.get("object")?.get("key")?.as_str()?;

    Some(TriggerEntry {
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}
