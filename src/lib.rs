//! # logsink - Lightweight Network Log Receiver
//!
//! logsink accepts TCP connections from remote devices emitting syslog-style
//! text, persists every received chunk to a per-client, per-day log file, and
//! reclaims disk space by deleting log files older than a retention window.
//!
//! ## Features
//!
//! - **Task-per-connection**: async I/O with Tokio, one task per client
//! - **Per-client daily files**: `<prefix>_<YYYYMMDD>_<ip>.txt` in one directory
//! - **Legacy encoding**: strict GBK decode with a pluggable decoder seam
//! - **Retention sweep**: background deletion of files past a configurable age
//!
//! ## Quick Start
//!
//! ```no_run
//! use logsink::config::ServerConfig;
//! use logsink::server::LogServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_file("config/server.toml")?;
//!     let server = LogServer::new(config).await?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod server;

/// Common error types used throughout logsink
pub mod error {
    use std::fmt;

    /// logsink error types
    #[derive(Debug)]
    pub enum LogSinkError {
        /// I/O operation failed
        Io(std::io::Error),
        /// Configuration error
        Config(String),
        /// Server error
        Server(String),
    }

    impl fmt::Display for LogSinkError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                LogSinkError::Io(e) => write!(f, "I/O error: {}", e),
                LogSinkError::Config(e) => write!(f, "Configuration error: {}", e),
                LogSinkError::Server(e) => write!(f, "Server error: {}", e),
            }
        }
    }

    impl std::error::Error for LogSinkError {}

    impl From<std::io::Error> for LogSinkError {
        fn from(err: std::io::Error) -> Self {
            LogSinkError::Io(err)
        }
    }

    /// Result type alias for logsink operations
    pub type Result<T> = std::result::Result<T, LogSinkError>;
}

pub use error::{LogSinkError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ServerConfig;
    pub use crate::server::decode::{GbkDecoder, PayloadDecoder};
    pub use crate::server::{LogServer, LogStorage, RetentionSweeper};
    pub use crate::{LogSinkError, Result};
}
