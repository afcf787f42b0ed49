use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A chat message record as held by the persistence service.
///
/// `content` is plaintext or a cipher envelope depending on where in the
/// pipeline the record is; nothing else is ever rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub content: String,
    /// Unix seconds
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl Message {
    /// Build a new record with a fresh UUID and the current timestamp.
    pub fn new(chat_id: impl Into<String>, sender_id: Option<String>, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender_id,
            content,
            created_at: unix_now(),
            updated_at: None,
        }
    }

    /// Replace the content and stamp `updated_at`.
    pub fn with_content(mut self, content: String) -> Self {
        self.content = content;
        self.updated_at = Some(unix_now());
        self
    }
}

/// A message after it went through the display path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedMessage {
    pub id: String,
    pub chat_id: String,
    pub sender_id: Option<String>,
    pub text: String,
    pub created_at: u64,
}

/// Current time as Unix seconds (0 if the clock is before the epoch).
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
