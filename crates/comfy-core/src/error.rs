use thiserror::Error;

pub type ComfyResult<T> = Result<T, ComfyError>;

#[derive(Debug, Error)]
pub enum ComfyError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
