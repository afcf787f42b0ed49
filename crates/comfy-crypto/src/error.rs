use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

/// Failures of the message encryption pipeline.
///
/// Only `InvalidInput` is meant to reach a caller unhandled; the other two
/// are recovered by the send and display paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}
