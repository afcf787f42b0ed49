//! Key derivation: chat identifier → per-chat key (HKDF-SHA256)

use hkdf::Hkdf;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{CryptoError, CryptoResult, KEY_SIZE};

/// HKDF info string; bump the version to move every chat to a new key space.
const CHAT_KEY_INFO: &[u8] = b"comfy-chat-key/v1";

/// A 256-bit per-chat key. Zeroized on drop.
#[derive(Clone)]
pub struct ChatKey {
    bytes: [u8; KEY_SIZE],
}

impl ChatKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for ChatKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for ChatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the key for `chat_id`.
///
/// Deterministic across processes and restarts: stored messages stay
/// decryptable only as long as the chat id (and `shared_secret`) do not
/// change. A blank chat id is a caller bug and yields `InvalidInput`.
pub fn derive_chat_key(
    chat_id: &str,
    shared_secret: Option<&SecretString>,
) -> CryptoResult<ChatKey> {
    if chat_id.trim().is_empty() {
        return Err(CryptoError::InvalidInput(
            "chat id must not be empty".into(),
        ));
    }

    let salt = shared_secret
        .map(|s| s.expose_secret().as_bytes())
        .filter(|s| !s.is_empty());
    let hkdf = Hkdf::<Sha256>::new(salt, chat_id.as_bytes());

    let mut okm = [0u8; KEY_SIZE];
    hkdf.expand(CHAT_KEY_INFO, &mut okm)
        .map_err(|e| CryptoError::InvalidInput(format!("HKDF expand failed: {e}")))?;

    Ok(ChatKey::from_bytes(okm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_deterministic() {
        let k1 = derive_chat_key("chat-42", None).unwrap();
        let k2 = derive_chat_key("chat-42", None).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes(), "derivation must be deterministic");
    }

    #[test]
    fn test_different_chats_different_keys() {
        let k1 = derive_chat_key("chat-1", None).unwrap();
        let k2 = derive_chat_key("chat-2", None).unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_shared_secret_changes_key() {
        let secret = SecretString::from("pepper");
        let plain = derive_chat_key("chat-1", None).unwrap();
        let salted = derive_chat_key("chat-1", Some(&secret)).unwrap();
        assert_ne!(plain.as_bytes(), salted.as_bytes());
    }

    #[test]
    fn test_empty_shared_secret_is_no_secret() {
        let empty = SecretString::from("");
        let plain = derive_chat_key("chat-1", None).unwrap();
        let with_empty = derive_chat_key("chat-1", Some(&empty)).unwrap();
        assert_eq!(plain.as_bytes(), with_empty.as_bytes());
    }

    #[test]
    fn test_empty_chat_id_rejected() {
        assert!(matches!(
            derive_chat_key("", None),
            Err(CryptoError::InvalidInput(_))
        ));
        assert!(matches!(
            derive_chat_key("   ", None),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = derive_chat_key("chat-1", None).unwrap();
        let dbg = format!("{key:?}");
        assert!(dbg.contains("REDACTED"));
    }
}
