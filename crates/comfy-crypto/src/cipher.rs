//! XChaCha20-Poly1305 message encryption/decryption
//!
//! Each call draws a fresh 192-bit nonce, so encrypting the same text twice
//! yields different envelopes. The envelope prefix is bound as AAD; a
//! version-1 body cannot be replayed under another format tag.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use crate::envelope::{self, ENVELOPE_PREFIX};
use crate::kdf::ChatKey;
use crate::{CryptoError, CryptoResult, NONCE_SIZE};

/// Encrypt `plaintext` under `key`, returning a cipher envelope string.
pub fn encrypt(plaintext: &str, key: &ChatKey) -> CryptoResult<String> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let sealed = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext.as_bytes(),
                aad: ENVELOPE_PREFIX.as_bytes(),
            },
        )
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(envelope::seal(&nonce_bytes, &sealed))
}

/// Decrypt a cipher envelope produced by [`encrypt`].
///
/// Malformed envelopes, a wrong key and tampered bytes all yield
/// `DecryptionFailed`.
pub fn decrypt(envelope: &str, key: &ChatKey) -> CryptoResult<String> {
    let (nonce_bytes, sealed) = envelope::open(envelope)?;
    let nonce = XNonce::from_slice(&nonce_bytes);
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let plaintext = cipher
        .decrypt(
            nonce,
            Payload {
                msg: &sealed,
                aad: ENVELOPE_PREFIX.as_bytes(),
            },
        )
        .map_err(|_| {
            CryptoError::DecryptionFailed("wrong key or corrupted ciphertext".into())
        })?;

    String::from_utf8(plaintext)
        .map_err(|e| CryptoError::DecryptionFailed(format!("plaintext is not UTF-8: {e}")))
}
