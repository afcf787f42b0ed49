//! comfy-storage: persistence for chat message records via OpenDAL
//!
//! Layout:
//! ```text
//! {prefix}/chats/{escaped chat id}/messages/{message id}.json
//! ```

pub mod health;
pub mod messages;
pub mod operator;

pub use health::check_health;
pub use messages::MessageStore;
pub use operator::{build_from_core_config, build_memory_operator, S3Credentials};
