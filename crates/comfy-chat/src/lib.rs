//! comfy-chat: the two integration points between chat UI and storage
//!
//! Every message entering a conversation view goes through
//! [`MessageDisplayAdapter`]; every composed message goes through
//! [`MessageSendAdapter`] before it is persisted. [`ChatSession`] wires both
//! to a [`comfy_storage::MessageStore`].

pub mod cipher;
pub mod display;
pub mod send;
pub mod session;

pub use cipher::ContentCipher;
pub use display::MessageDisplayAdapter;
pub use send::{MessageSendAdapter, OutboundContent};
pub use session::{ChatSession, MigrationReport};
