pub mod config;
pub mod error;
pub mod types;

pub use error::{ComfyError, ComfyResult};
pub use types::Message;
