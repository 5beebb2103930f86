//! logsink server implementation

pub mod decode;
pub mod retention;
pub mod session;
pub mod storage;
pub mod tcp;

use crate::config::ServerConfig;
use crate::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;

pub use retention::RetentionSweeper;
pub use session::{Session, SessionEnd, ACK};
pub use storage::LogStorage;
pub use tcp::TcpReceiver;

/// Main logsink server that coordinates the acceptor and the retention sweeper
pub struct LogServer {
    config: ServerConfig,
    receiver: TcpReceiver,
    shutdown_tx: broadcast::Sender<()>,
}

impl LogServer {
    /// Create a new server with the given configuration, binding the listener
    pub async fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let storage = Arc::new(LogStorage::new(config.storage.clone()));
        let (shutdown_tx, _) = broadcast::channel(1);
        let receiver = TcpReceiver::bind(&config, storage, shutdown_tx.subscribe()).await?;

        Ok(Self {
            config,
            receiver,
            shutdown_tx,
        })
    }

    /// The address the listener bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.receiver.local_addr()
    }

    /// Sender that stops the accept loop and the sweeper when signalled
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Run the retention sweeper in the background and serve connections
    pub async fn start(self) -> Result<()> {
        let sweeper = RetentionSweeper::new(
            self.config.retention.clone(),
            self.config.storage.clone(),
        );
        tokio::spawn(sweeper.start(self.shutdown_tx.subscribe()));

        self.receiver.start().await
    }
}
