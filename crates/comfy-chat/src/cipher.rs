use comfy_crypto::{CryptoResult, EncryptionService};

/// What the adapters need from the encryption layer.
pub trait ContentCipher: Send + Sync {
    fn is_encrypted(&self, content: &str) -> bool;

    fn process_message_for_storage(&self, content: &str, chat_id: &str) -> CryptoResult<String>;

    fn process_message_for_display(&self, content: &str, chat_id: &str) -> String;
}

impl ContentCipher for EncryptionService {
    fn is_encrypted(&self, content: &str) -> bool {
        EncryptionService::is_encrypted(self, content)
    }

    fn process_message_for_storage(&self, content: &str, chat_id: &str) -> CryptoResult<String> {
        EncryptionService::process_message_for_storage(self, content, chat_id)
    }

    fn process_message_for_display(&self, content: &str, chat_id: &str) -> String {
        EncryptionService::process_message_for_display(self, content, chat_id)
    }
}
