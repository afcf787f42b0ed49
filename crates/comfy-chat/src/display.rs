//! Inbound integration point: stored record → text shown to the user.

use std::sync::Arc;

use comfy_core::types::DisplayedMessage;
use comfy_core::Message;

use crate::ContentCipher;

#[derive(Clone)]
pub struct MessageDisplayAdapter {
    cipher: Arc<dyn ContentCipher>,
}

impl MessageDisplayAdapter {
    pub fn new(cipher: Arc<dyn ContentCipher>) -> Self {
        Self { cipher }
    }

    /// Display text for a fetched or realtime-delivered record. Never fails.
    pub fn render(&self, message: &Message) -> String {
        self.cipher
            .process_message_for_display(&message.content, &message.chat_id)
    }

    pub fn to_displayed(&self, message: &Message) -> DisplayedMessage {
        DisplayedMessage {
            id: message.id.clone(),
            chat_id: message.chat_id.clone(),
            sender_id: message.sender_id.clone(),
            text: self.render(message),
            created_at: message.created_at,
        }
    }

    pub fn render_all(&self, messages: &[Message]) -> Vec<DisplayedMessage> {
        messages.iter().map(|m| self.to_displayed(m)).collect()
    }
}
