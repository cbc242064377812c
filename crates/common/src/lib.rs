//! amqpctl Common Library
//!
//! Shared types, configuration and errors for the amqpctl workspace.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ClientConfig, PollSettings};
pub use error::{Error, Result};
pub use types::*;

/// amqpctl version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default config path
pub fn default_config_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".amqpctl")
        .join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
