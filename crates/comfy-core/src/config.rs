use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{ComfyError, ComfyResult};

/// Marker prepended to stored content that looks encrypted but cannot be decrypted.
pub const DEFAULT_UNDECRYPTABLE_MARKER: &str = "[undecryptable message] ";

/// Top-level configuration (loaded from comfy.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfyConfig {
    pub log: LogConfig,
    pub crypto: CryptoConfig,
    pub storage: StorageConfig,
}

impl ComfyConfig {
    /// Parse a config from TOML text. Missing sections fall back to defaults.
    pub fn from_toml_str(s: &str) -> ComfyResult<Self> {
        toml::from_str(s).map_err(|e| ComfyError::Config(e.to_string()))
    }

    /// Load the config at `path`, or the defaults if the file does not exist.
    pub fn load(path: &Path) -> ComfyResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| ComfyError::Config(format!("parsing {}: {e}", path.display())))
    }

    pub fn to_toml_string(&self) -> ComfyResult<String> {
        toml::to_string_pretty(self).map_err(|e| ComfyError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Chat message encryption configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Optional secret mixed into every chat key as the HKDF salt.
    ///
    /// Empty means keys derive from the chat id alone, which is what existing
    /// stored ciphertext was produced with. Changing it makes older messages
    /// undecryptable.
    pub shared_secret: String,
    /// Prefix shown in place of a message that fails to decrypt
    pub undecryptable_marker: String,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            shared_secret: String::new(),
            undecryptable_marker: DEFAULT_UNDECRYPTABLE_MARKER.into(),
        }
    }
}

/// Which OpenDAL service backs the message store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Fs,
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the fs backend
    pub root: PathBuf,
    /// Key prefix under which chats are stored
    pub prefix: String,
    /// S3 endpoint
    pub endpoint: String,
    /// S3 region (default: us-east-1)
    pub region: String,
    /// Bucket name
    pub bucket: String,
    /// Enforce HTTPS for S3 connections (error on HTTP endpoints)
    pub enforce_tls: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            root: PathBuf::from("~/.local/share/comfy"),
            prefix: "comfy".into(),
            endpoint: "http://localhost:8333".into(),
            region: "us-east-1".into(),
            bucket: "comfy".into(),
            enforce_tls: false,
        }
    }
}

/// Expand `~` in path to the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(home).join(rest)
        }
        None => path.to_path_buf(),
    }
}
