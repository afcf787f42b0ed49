//! comfy-crypto: chat message encryption for the Comfy CMS
//!
//! Pipeline:
//! ```text
//! send:    plaintext → derive_chat_key(chat_id) → XChaCha20-Poly1305 → "cms1:" + base64 → store
//! display: stored → is_encrypted? → decrypt | pass-through → on failure: marker + raw value
//! ```
//!
//! Keys are derived from the chat identifier with HKDF-SHA256, optionally
//! salted with a deployment-wide shared secret. There is no key exchange:
//! anyone holding the chat id (and the secret, if set) can derive the key.

pub mod cache;
pub mod cipher;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod service;

pub use cache::KeyCache;
pub use cipher::{decrypt, encrypt};
pub use envelope::{is_encrypted, ENVELOPE_PREFIX};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{derive_chat_key, ChatKey};
pub use service::{EncryptionOptions, EncryptionService};

/// Size of a chat key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;
