//! Message record store: one JSON object per message.
//!
//! The store never looks inside `content`; whatever the send path produced
//! is written verbatim and handed back verbatim.

use opendal::{ErrorKind, Operator};
use tracing::debug;

use comfy_core::{ComfyError, ComfyResult, Message};

#[derive(Debug, Clone)]
pub struct MessageStore {
    op: Operator,
    prefix: String,
}

impl MessageStore {
    pub fn new(op: Operator, prefix: &str) -> Self {
        Self {
            op,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub fn operator(&self) -> &Operator {
        &self.op
    }

    /// Write (or overwrite) a record.
    pub async fn save(&self, message: &Message) -> ComfyResult<()> {
        let key = self.message_key(&message.chat_id, &message.id);
        let body = serde_json::to_vec(message)
            .map_err(|e| ComfyError::Storage(format!("serializing message {}: {e}", message.id)))?;

        self.op
            .write(&key, body)
            .await
            .map_err(|e| ComfyError::Storage(format!("writing {key}: {e}")))?;

        debug!(chat_id = %message.chat_id, message_id = %message.id, "message saved");
        Ok(())
    }

    /// Fetch one record; `None` if it does not exist.
    pub async fn load(&self, chat_id: &str, id: &str) -> ComfyResult<Option<Message>> {
        let key = self.message_key(chat_id, id);
        match self.op.read(&key).await {
            Ok(data) => parse_record(&key, &data.to_vec()).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ComfyError::Storage(format!("reading {key}: {e}"))),
        }
    }

    /// All records of a chat, oldest first (ties broken by id).
    pub async fn list(&self, chat_id: &str) -> ComfyResult<Vec<Message>> {
        let dir = self.chat_dir(chat_id);
        let entries = match self.op.list(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ComfyError::Storage(format!("listing {dir}: {e}"))),
        };

        let mut messages = Vec::with_capacity(entries.len());
        for entry in entries {
            if !entry.name().ends_with(".json") {
                continue;
            }
            let data = self
                .op
                .read(entry.path())
                .await
                .map_err(|e| ComfyError::Storage(format!("reading {}: {e}", entry.path())))?;
            messages.push(parse_record(entry.path(), &data.to_vec())?);
        }

        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(messages)
    }

    /// Remove a record. Deleting a missing record is not an error.
    pub async fn delete(&self, chat_id: &str, id: &str) -> ComfyResult<()> {
        let key = self.message_key(chat_id, id);
        self.op
            .delete(&key)
            .await
            .map_err(|e| ComfyError::Storage(format!("deleting {key}: {e}")))
    }

    fn chat_dir(&self, chat_id: &str) -> String {
        format!("{}/chats/{}/messages/", self.prefix, escape_segment(chat_id))
    }

    fn message_key(&self, chat_id: &str, id: &str) -> String {
        format!("{}{}.json", self.chat_dir(chat_id), escape_segment(id))
    }
}

fn parse_record(key: &str, data: &[u8]) -> ComfyResult<Message> {
    serde_json::from_slice(data).map_err(|e| ComfyError::Storage(format!("parsing {key}: {e}")))
}

/// Percent-encode everything outside `[A-Za-z0-9_-]` so a segment can never
/// contain `/` or be `.`/`..`.
pub fn escape_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_keeps_safe_ids() {
        assert_eq!(escape_segment("chat-42_a"), "chat-42_a");
    }

    #[test]
    fn escape_blocks_traversal() {
        assert_eq!(escape_segment(".."), "%2E%2E");
        assert_eq!(escape_segment("a/b"), "a%2Fb");
        assert_eq!(escape_segment("é"), "%C3%A9");
    }

    #[test]
    fn keys_are_under_prefix() {
        let op = crate::operator::build_memory_operator().unwrap();
        let store = MessageStore::new(op, "/cms/");
        assert_eq!(
            store.message_key("chat-1", "m1"),
            "cms/chats/chat-1/messages/m1.json"
        );
    }
}
