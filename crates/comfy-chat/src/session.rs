//! Chat session: send/history/migration over a message store.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use comfy_core::types::DisplayedMessage;
use comfy_core::{ComfyError, ComfyResult, Message};
use comfy_storage::MessageStore;

use crate::{ContentCipher, MessageDisplayAdapter, MessageSendAdapter};

/// Outcome of encrypting a chat's legacy plaintext records in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub scanned: usize,
    /// Plaintext records rewritten as envelopes
    pub encrypted: usize,
    /// Records that were already envelopes
    pub skipped: usize,
    /// Plaintext records left untouched because encryption failed
    pub failed: usize,
}

pub struct ChatSession {
    store: MessageStore,
    cipher: Arc<dyn ContentCipher>,
    display: MessageDisplayAdapter,
    send: MessageSendAdapter,
}

impl ChatSession {
    pub fn new(store: MessageStore, cipher: Arc<dyn ContentCipher>) -> Self {
        Self {
            display: MessageDisplayAdapter::new(cipher.clone()),
            send: MessageSendAdapter::new(cipher.clone()),
            store,
            cipher,
        }
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Encrypt `body` and persist it as a new record in `chat_id`.
    pub async fn send(
        &self,
        chat_id: &str,
        sender_id: Option<&str>,
        body: &str,
    ) -> ComfyResult<Message> {
        let outbound = self
            .send
            .prepare(chat_id, body)
            .map_err(|e| ComfyError::Crypto(e.to_string()))?;

        let message = Message::new(chat_id, sender_id.map(str::to_string), outbound.content);
        self.store.save(&message).await?;

        debug!(
            chat_id,
            message_id = %message.id,
            encrypted = outbound.encrypted,
            "message sent"
        );
        Ok(message)
    }

    /// Display form of a single record, e.g. one delivered by a realtime feed.
    pub fn receive(&self, message: &Message) -> DisplayedMessage {
        self.display.to_displayed(message)
    }

    /// Every record of `chat_id` in display form, oldest first.
    pub async fn history(&self, chat_id: &str) -> ComfyResult<Vec<DisplayedMessage>> {
        let records = self.store.list(chat_id).await?;
        Ok(self.display.render_all(&records))
    }

    /// Rewrite plaintext records of `chat_id` as envelopes.
    ///
    /// Records already recognised as envelopes are left alone, so running
    /// this twice never double-encrypts.
    pub async fn migrate_legacy(&self, chat_id: &str) -> ComfyResult<MigrationReport> {
        let mut report = MigrationReport::default();

        for record in self.store.list(chat_id).await? {
            report.scanned += 1;
            if self.cipher.is_encrypted(&record.content) {
                report.skipped += 1;
                continue;
            }

            let outbound = self
                .send
                .prepare(&record.chat_id, &record.content)
                .map_err(|e| ComfyError::Crypto(e.to_string()))?;
            if !outbound.encrypted {
                report.failed += 1;
                continue;
            }

            self.store.save(&record.with_content(outbound.content)).await?;
            report.encrypted += 1;
        }

        info!(
            chat_id,
            scanned = report.scanned,
            encrypted = report.encrypted,
            skipped = report.skipped,
            failed = report.failed,
            "legacy migration finished"
        );
        Ok(report)
    }
}
