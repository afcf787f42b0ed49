//! comfy: Comfy CMS chat message tool
//!
//! Message commands (no storage):
//!   encrypt --chat <id> <text>      - print the cipher envelope
//!   decrypt --chat <id> <envelope>  - print the plaintext
//!   detect <content>                - "encrypted" or "plaintext"
//!   display --chat <id> <content>   - what the conversation view would show
//!
//! Chat commands (configured message store):
//!   send --chat <id> <text>         - encrypt and store a message
//!   history --chat <id>             - list decrypted messages
//!   migrate --chat <id>             - encrypt legacy plaintext records in place
//!
//!   config show                     - display current configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use comfy_chat::ChatSession;
use comfy_core::config::{ComfyConfig, StorageBackend};
use comfy_crypto::EncryptionService;
use comfy_storage::{MessageStore, S3Credentials};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "comfy",
    version,
    about = "Comfy CMS chat message tool",
    long_about = "comfy: encrypt, decrypt and inspect Comfy CMS chat messages"
)]
struct Cli {
    /// Path to comfy.toml configuration file
    #[arg(long, short = 'c', env = "COMFY_CONFIG", default_value = "/etc/comfy/config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "COMFY_LOG")]
    log: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "COMFY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a message body for a chat
    Encrypt {
        #[arg(long)]
        chat: String,
        text: String,
    },

    /// Decrypt a stored envelope
    Decrypt {
        #[arg(long)]
        chat: String,
        envelope: String,
    },

    /// Report whether stored content looks encrypted
    Detect { content: String },

    /// Render stored content the way the conversation view does
    Display {
        #[arg(long)]
        chat: String,
        content: String,
    },

    /// Encrypt and store a new message
    Send {
        #[arg(long)]
        chat: String,
        /// Sender profile id
        #[arg(long)]
        sender: Option<String>,
        text: String,
    },

    /// Print the decrypted history of a chat
    History {
        #[arg(long)]
        chat: String,
        /// Print JSON instead of one line per message
        #[arg(long)]
        json: bool,
    },

    /// Encrypt stored plaintext (pre-encryption) messages of a chat
    Migrate {
        #[arg(long)]
        chat: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ComfyConfig::load(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    init_logging(&cli, &config);
    if !cli.config.exists() {
        warn!(
            "config file not found: {}  (using defaults)",
            cli.config.display()
        );
    }

    let service = Arc::new(EncryptionService::from_config(&config.crypto));

    match cli.command {
        Commands::Encrypt { chat, text } => {
            println!("{}", service.encrypt_message(&text, &chat)?);
            Ok(())
        }
        Commands::Decrypt { chat, envelope } => {
            println!("{}", service.decrypt_message(&envelope, &chat)?);
            Ok(())
        }
        Commands::Detect { content } => {
            let kind = if service.is_encrypted(&content) {
                "encrypted"
            } else {
                "plaintext"
            };
            println!("{kind}");
            Ok(())
        }
        Commands::Display { chat, content } => {
            println!("{}", service.process_message_for_display(&content, &chat));
            Ok(())
        }
        Commands::Send { chat, sender, text } => {
            let session = open_session(&config, service)?;
            let message = session.send(&chat, sender.as_deref(), &text).await?;
            println!("{}", message.id);
            Ok(())
        }
        Commands::History { chat, json } => {
            let session = open_session(&config, service)?;
            cmd_history(&session, &chat, json).await
        }
        Commands::Migrate { chat } => {
            let session = open_session(&config, service)?;
            let report = session.migrate_legacy(&chat).await?;
            println!("Migration complete:");
            println!("  scanned:   {}", report.scanned);
            println!("  encrypted: {}", report.encrypted);
            println!("  skipped:   {} (already encrypted)", report.skipped);
            println!("  failed:    {}", report.failed);
            Ok(())
        }
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &cli.config),
    }
}

fn init_logging(cli: &Cli, config: &ComfyConfig) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = cli.log.as_deref().unwrap_or(&config.log.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let json = match &cli.log_format {
        Some(format) => matches!(format, LogFormat::Json),
        None => config.log.format.eq_ignore_ascii_case("json"),
    };

    // Logs go to stderr so command output stays pipeable
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

// ── Storage ───────────────────────────────────────────────────────────────────

fn open_session(config: &ComfyConfig, service: Arc<EncryptionService>) -> Result<ChatSession> {
    let creds = match config.storage.backend {
        StorageBackend::S3 => Some(S3Credentials::from_env()?),
        StorageBackend::Memory => {
            warn!("storage backend is 'memory': messages are not kept after this command exits");
            None
        }
        StorageBackend::Fs => None,
    };

    let op = comfy_storage::build_from_core_config(&config.storage, creds.as_ref())
        .context("building storage operator")?;
    info!(backend = ?config.storage.backend, prefix = %config.storage.prefix, "message store ready");

    Ok(ChatSession::new(
        MessageStore::new(op, &config.storage.prefix),
        service,
    ))
}

// ── `comfy history` ───────────────────────────────────────────────────────────

async fn cmd_history(session: &ChatSession, chat: &str, json: bool) -> Result<()> {
    let messages = session.history(chat).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&messages).context("serializing history")?
        );
        return Ok(());
    }

    if messages.is_empty() {
        println!("(no messages in {chat})");
    }
    for m in &messages {
        let sender = m.sender_id.as_deref().unwrap_or("-");
        println!("[{}] {}: {}", m.created_at, sender, m.text);
    }
    Ok(())
}

// ── `comfy config show` ───────────────────────────────────────────────────────

fn cmd_config_show(config: &ComfyConfig, path: &Path) -> Result<()> {
    let mut shown = config.clone();
    if !shown.crypto.shared_secret.is_empty() {
        shown.crypto.shared_secret = "[REDACTED]".into();
    }

    println!("# config: {}", path.display());
    print!("{}", shown.to_toml_string()?);
    Ok(())
}
