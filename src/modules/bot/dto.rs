//! The subset of the Bot API `Update` object the intake looks at.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub edited_message: Option<Message>,
    pub channel_post: Option<Message>,
    pub edited_channel_post: Option<Message>,
}

impl Update {
    pub fn effective_message(&self) -> Option<&Message> {
        self.message
            .as_ref()
            .or(self.edited_message.as_ref())
            .or(self.channel_post.as_ref())
            .or(self.edited_channel_post.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    pub animation: Option<FileRef>,
    pub audio: Option<FileRef>,
    pub document: Option<FileRef>,
    /// Available sizes, smallest first.
    pub photo: Option<Vec<FileRef>>,
    pub sticker: Option<FileRef>,
    pub video: Option<FileRef>,
    pub video_note: Option<FileRef>,
    pub voice: Option<FileRef>,
}

impl Message {
    /// The downloadable file carried by this message, if any.
    pub fn attachment(&self) -> Option<&FileRef> {
        self.animation
            .as_ref()
            .or(self.audio.as_ref())
            .or(self.document.as_ref())
            .or_else(|| self.photo.as_ref().and_then(|sizes| sizes.last()))
            .or(self.sticker.as_ref())
            .or(self.video.as_ref())
            .or(self.video_note.as_ref())
            .or(self.voice.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileRef {
    pub file_id: String,
}

/// Outcome of one output-bucket notification.
#[derive(Debug, Default, Serialize, ToSchema, PartialEq, Eq)]
pub struct NotificationReport {
    pub received: usize,
    pub notified: usize,
    pub skipped: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookResponse {
    pub url: String,
}
