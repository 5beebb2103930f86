//! Configuration structures for logsink

use crate::{LogSinkError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listener settings
    pub server: ServerSettings,
    /// Storage configuration
    pub storage: StorageSettings,
    /// Retention sweep configuration
    pub retention: RetentionSettings,
}

/// Core listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind the TCP listener to
    pub bind_address: String,
    /// Port to bind the TCP listener to
    pub port: u16,
    /// Buffer size for reading data from a client
    pub buffer_size: usize,
    /// Seconds a session may sit idle before it is closed
    pub idle_timeout_secs: u64,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory to store log files
    pub output_directory: PathBuf,
    /// Prefix for every log file name
    pub file_prefix: String,
}

/// Retention sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionSettings {
    /// Enable the background retention sweep
    pub enabled: bool,
    /// Maximum age of log files in whole days
    pub max_age_days: u64,
    /// Seconds between sweeps
    pub sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind_address: "0.0.0.0".to_string(),
                port: 514,
                buffer_size: 2048,
                idle_timeout_secs: 60,
            },
            storage: StorageSettings {
                output_directory: PathBuf::from("log"),
                file_prefix: "ATS_PSD_log".to_string(),
            },
            retention: RetentionSettings {
                enabled: true,
                max_age_days: 30,
                sweep_interval_secs: 86400,
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LogSinkError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| LogSinkError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_address.is_empty() {
            return Err(LogSinkError::Config(
                "Bind address cannot be empty".to_string(),
            ));
        }
        if self.server.buffer_size == 0 {
            return Err(LogSinkError::Config(
                "Buffer size must be non-zero".to_string(),
            ));
        }
        if self.server.idle_timeout_secs == 0 {
            return Err(LogSinkError::Config(
                "Idle timeout must be non-zero".to_string(),
            ));
        }
        if self.storage.file_prefix.is_empty() {
            return Err(LogSinkError::Config(
                "File prefix cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The bind endpoint as an `addr:port` string
    pub fn bind_endpoint(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    /// Session idle timeout as a `Duration`
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.idle_timeout_secs)
    }
}
