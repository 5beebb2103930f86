//! Configuration management for logsink

pub mod settings;

pub use settings::{RetentionSettings, ServerConfig, ServerSettings, StorageSettings};
