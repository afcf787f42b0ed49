//! Cipher envelope: the string form of an encrypted message
//!
//! ```text
//! "cms1:" || base64(nonce[24] || ciphertext || tag[16])
//! ```
//!
//! The prefix lets `is_encrypted` classify stored content without a key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{CryptoError, CryptoResult, NONCE_SIZE, TAG_SIZE};

/// Marks stored content as a cipher envelope (format version 1).
pub const ENVELOPE_PREFIX: &str = "cms1:";

/// Heuristic check for envelope-shaped content.
///
/// Only the prefix and a non-empty body are checked, so a tampered body is
/// still classified as encrypted and surfaces as a decryption failure
/// instead of being shown as plaintext.
pub fn is_encrypted(content: &str) -> bool {
    content
        .strip_prefix(ENVELOPE_PREFIX)
        .is_some_and(|body| !body.is_empty())
}

/// Serialize nonce and sealed bytes into an envelope string.
pub(crate) fn seal(nonce: &[u8; NONCE_SIZE], sealed: &[u8]) -> String {
    let mut raw = Vec::with_capacity(NONCE_SIZE + sealed.len());
    raw.extend_from_slice(nonce);
    raw.extend_from_slice(sealed);
    format!("{ENVELOPE_PREFIX}{}", STANDARD.encode(raw))
}

/// Split an envelope into its nonce and sealed bytes.
pub(crate) fn open(envelope: &str) -> CryptoResult<([u8; NONCE_SIZE], Vec<u8>)> {
    let body = envelope.strip_prefix(ENVELOPE_PREFIX).ok_or_else(|| {
        CryptoError::DecryptionFailed("missing envelope prefix".into())
    })?;

    let raw = STANDARD
        .decode(body)
        .map_err(|e| CryptoError::DecryptionFailed(format!("base64 decode: {e}")))?;

    if raw.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::DecryptionFailed(format!(
            "envelope too short: {} bytes (minimum {})",
            raw.len(),
            NONCE_SIZE + TAG_SIZE
        )));
    }

    let (nonce_bytes, sealed) = raw.split_at(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_bytes);
    Ok((nonce, sealed.to_vec()))
}
