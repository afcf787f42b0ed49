//! Encryption service: the façade the chat pipeline talks to.
//!
//! Owns the key cache and the deployment options. Every operation is
//! synchronous and independent given its `(content, chat_id)` inputs.

use secrecy::SecretString;
use tracing::warn;

use comfy_core::config::{CryptoConfig, DEFAULT_UNDECRYPTABLE_MARKER};

use crate::cache::KeyCache;
use crate::kdf::{derive_chat_key, ChatKey};
use crate::{cipher, envelope, CryptoResult};

/// Deployment-wide options for the encryption service
#[derive(Debug)]
pub struct EncryptionOptions {
    /// HKDF salt for every chat key; `None` derives from the chat id alone
    pub shared_secret: Option<SecretString>,
    /// Prefix for content that looks encrypted but fails to decrypt
    pub undecryptable_marker: String,
}

impl Default for EncryptionOptions {
    fn default() -> Self {
        Self {
            shared_secret: None,
            undecryptable_marker: DEFAULT_UNDECRYPTABLE_MARKER.into(),
        }
    }
}

impl From<&CryptoConfig> for EncryptionOptions {
    fn from(config: &CryptoConfig) -> Self {
        let shared_secret = if config.shared_secret.is_empty() {
            None
        } else {
            Some(SecretString::from(config.shared_secret.as_str()))
        };
        Self {
            shared_secret,
            undecryptable_marker: config.undecryptable_marker.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EncryptionService {
    options: EncryptionOptions,
    keys: KeyCache,
}

impl EncryptionService {
    pub fn new(options: EncryptionOptions) -> Self {
        Self {
            options,
            keys: KeyCache::new(),
        }
    }

    pub fn from_config(config: &CryptoConfig) -> Self {
        Self::new(EncryptionOptions::from(config))
    }

    pub fn options(&self) -> &EncryptionOptions {
        &self.options
    }

    pub fn key_cache(&self) -> &KeyCache {
        &self.keys
    }

    /// Encrypt `content` with the key for `chat_id`.
    pub fn encrypt_message(&self, content: &str, chat_id: &str) -> CryptoResult<String> {
        let key = self.chat_key(chat_id)?;
        cipher::encrypt(content, &key)
    }

    /// Decrypt an envelope with the key for `chat_id`.
    pub fn decrypt_message(&self, ciphertext: &str, chat_id: &str) -> CryptoResult<String> {
        let key = self.chat_key(chat_id)?;
        cipher::decrypt(ciphertext, &key)
    }

    /// Whether `content` looks like an envelope this service produces.
    pub fn is_encrypted(&self, content: &str) -> bool {
        envelope::is_encrypted(content)
    }

    /// Outbound path: content is always encrypted before storage.
    pub fn process_message_for_storage(&self, content: &str, chat_id: &str) -> CryptoResult<String> {
        self.encrypt_message(content, chat_id)
    }

    /// Inbound path: never fails.
    ///
    /// Envelopes are decrypted; anything else (legacy plaintext) is returned
    /// unchanged. An envelope that cannot be decrypted comes back as the
    /// undecryptable marker followed by the raw stored value.
    pub fn process_message_for_display(&self, content: &str, chat_id: &str) -> String {
        if !self.is_encrypted(content) {
            return content.to_string();
        }

        match self.decrypt_message(content, chat_id) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!(chat_id, error = %e, "message could not be decrypted for display");
                format!("{}{}", self.options.undecryptable_marker, content)
            }
        }
    }

    fn chat_key(&self, chat_id: &str) -> CryptoResult<ChatKey> {
        let secret = self.options.shared_secret.as_ref();
        self.keys
            .get_or_derive(chat_id, |id| derive_chat_key(id, secret))
    }
}
