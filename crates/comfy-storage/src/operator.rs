//! OpenDAL Operator factory for the message store backends

use anyhow::{Context, Result};
use opendal::Operator;

use comfy_core::config::{expand_tilde, StorageBackend, StorageConfig};

/// S3 credentials, read from the environment by the CLI
#[derive(Debug, Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl S3Credentials {
    /// Read `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`, falling back to the
    /// `COMFY_`-prefixed names.
    pub fn from_env() -> Result<Self> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")
            .or_else(|_| std::env::var("COMFY_ACCESS_KEY_ID"))
            .context(
                "S3 credentials not set\n\
                 Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY environment variables.",
            )?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .or_else(|_| std::env::var("COMFY_SECRET_ACCESS_KEY"))
            .context("AWS_SECRET_ACCESS_KEY environment variable not set")?;
        Ok(Self {
            access_key_id,
            secret_access_key,
        })
    }
}

/// In-process operator; contents vanish with the process.
pub fn build_memory_operator() -> Result<Operator> {
    Ok(Operator::new(opendal::services::Memory::default())
        .context("creating OpenDAL memory operator")?
        .finish())
}

/// Local directory operator rooted at `root`.
pub fn build_fs_operator(root: &str) -> Result<Operator> {
    let builder = opendal::services::Fs::default().root(root);
    Ok(Operator::new(builder)
        .context("creating OpenDAL fs operator")?
        .layer(opendal::layers::LoggingLayer::default())
        .finish())
}

/// S3-compatible operator with path-style addressing and retries.
pub fn build_s3_operator(cfg: &StorageConfig, creds: &S3Credentials) -> Result<Operator> {
    let builder = opendal::services::S3::default()
        .endpoint(&cfg.endpoint)
        .region(&cfg.region)
        .bucket(&cfg.bucket)
        .access_key_id(&creds.access_key_id)
        .secret_access_key(&creds.secret_access_key);

    let op = Operator::new(builder)
        .context("creating OpenDAL S3 operator")?
        .layer(opendal::layers::LoggingLayer::default())
        .layer(
            opendal::layers::RetryLayer::new()
                .with_max_times(5)
                .with_jitter(),
        )
        .finish();

    Ok(op)
}

/// Build the operator selected by `storage.backend`.
///
/// For S3, an HTTP endpoint is rejected when `enforce_tls` is set and
/// logged as a warning otherwise. `creds` is only consulted for S3.
pub fn build_from_core_config(
    storage: &StorageConfig,
    creds: Option<&S3Credentials>,
) -> Result<Operator> {
    match storage.backend {
        StorageBackend::Memory => build_memory_operator(),
        StorageBackend::Fs => {
            let root = expand_tilde(&storage.root);
            build_fs_operator(&root.to_string_lossy())
        }
        StorageBackend::S3 => {
            if storage.endpoint.starts_with("http://") {
                if storage.enforce_tls {
                    anyhow::bail!(
                        "S3 endpoint uses plaintext HTTP ({}), but enforce_tls is enabled. \
                         Use an HTTPS endpoint or set storage.enforce_tls = false for local development.",
                        storage.endpoint
                    );
                }
                tracing::warn!(
                    endpoint = %storage.endpoint,
                    "S3 endpoint uses plaintext HTTP. Set storage.enforce_tls = true and use HTTPS in production."
                );
            }
            let creds = creds.context("S3 backend selected but no credentials supplied")?;
            build_s3_operator(storage, creds)
        }
    }
}
