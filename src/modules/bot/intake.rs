use super::dto::Update;

pub const START_COMMAND: &str = "/start";
pub const GREETING: &str = "Beep boop";
pub const PROCESSING: &str = "Processing...";

/// What to do with one inbound update. Updates are classified independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intake {
    /// Reply with the greeting; nothing is stored.
    Start { chat_id: i64 },
    /// Acknowledge, then store the attachment for conversion.
    Attachment { chat_id: i64, file_id: String },
    /// No command and nothing to convert.
    Ignore,
}

/// `/start` is matched exactly, or addressed to this bot as `/start@username`.
pub fn is_start_command(text: &str, bot_username: Option<&str>) -> bool {
    text == START_COMMAND
        || bot_username.is_some_and(|name| {
            text.strip_prefix(START_COMMAND)
                .and_then(|rest| rest.strip_prefix('@'))
                == Some(name)
        })
}

pub fn classify_update(update: &Update, bot_username: Option<&str>) -> Intake {
    let Some(message) = update.effective_message() else {
        return Intake::Ignore;
    };
    let chat_id = message.chat.id;

    if message
        .text
        .as_deref()
        .is_some_and(|text| is_start_command(text, bot_username))
    {
        return Intake::Start { chat_id };
    }

    match message.attachment() {
        Some(file) => Intake::Attachment {
            chat_id,
            file_id: file.file_id.clone(),
        },
        None => Intake::Ignore,
    }
}
