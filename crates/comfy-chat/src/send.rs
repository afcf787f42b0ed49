//! Outbound integration point: composed body → content handed to storage.

use std::sync::Arc;

use tracing::warn;

use comfy_crypto::{CryptoError, CryptoResult};

use crate::ContentCipher;

/// Content ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundContent {
    pub content: String,
    /// false when encryption failed and the plaintext body is sent instead
    pub encrypted: bool,
}

#[derive(Clone)]
pub struct MessageSendAdapter {
    cipher: Arc<dyn ContentCipher>,
}

impl MessageSendAdapter {
    pub fn new(cipher: Arc<dyn ContentCipher>) -> Self {
        Self { cipher }
    }

    /// Encrypt a composed body for `chat_id`.
    ///
    /// A cipher failure must not block the send, so `EncryptionFailed`
    /// degrades to the plaintext body. `InvalidInput` (blank chat id) is
    /// returned to the caller.
    pub fn prepare(&self, chat_id: &str, body: &str) -> CryptoResult<OutboundContent> {
        match self.cipher.process_message_for_storage(body, chat_id) {
            Ok(content) => Ok(OutboundContent {
                content,
                encrypted: true,
            }),
            Err(CryptoError::EncryptionFailed(reason)) => {
                warn!(chat_id, %reason, "encryption failed, sending message as plaintext");
                Ok(OutboundContent {
                    content: body.to_string(),
                    encrypted: false,
                })
            }
            Err(e) => Err(e),
        }
    }
}
