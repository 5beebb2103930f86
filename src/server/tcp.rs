//! TCP listener for accepting client connections

use crate::config::ServerConfig;
use crate::server::decode::GbkDecoder;
use crate::server::session::Session;
use crate::server::LogStorage;
use crate::{LogSinkError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info};

/// TCP server that accepts connections and spawns one session task each.
///
/// Concurrency is unbounded by design; ingestion rates from appliance
/// telemetry are low enough that admission control is not worth its cost.
pub struct TcpReceiver {
    listener: TcpListener,
    config: ServerConfig,
    storage: Arc<LogStorage>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl TcpReceiver {
    /// Bind the listener. A bind failure here is fatal to startup.
    pub async fn bind(
        config: &ServerConfig,
        storage: Arc<LogStorage>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<Self> {
        let endpoint = config.bind_endpoint();
        let listener = TcpListener::bind(&endpoint)
            .await
            .map_err(|e| LogSinkError::Server(format!("Failed to bind {}: {}", endpoint, e)))?;

        Ok(Self {
            listener,
            config: config.clone(),
            storage,
            shutdown_rx,
        })
    }

    /// The address the listener actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until shutdown is signalled
    pub async fn start(mut self) -> Result<()> {
        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            info!(peer = %addr, "Connected");
                            let session = Session::new(
                                stream,
                                addr.ip().to_string(),
                                GbkDecoder,
                                Arc::clone(&self.storage),
                                self.config.server.buffer_size,
                                self.config.idle_timeout(),
                            );
                            tokio::spawn(async move {
                                let end = session.run().await;
                                info!(peer = %addr, outcome = ?end, "Session ended");
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    info!("Accept loop stopping");
                    break;
                }
            }
        }

        Ok(())
    }
}
