//! Per-connection session handling

use crate::server::decode::PayloadDecoder;
use crate::server::storage::LogStorage;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// Acknowledgment sent after a chunk is accepted for processing.
///
/// Fire-and-forget: it signals "bytes accepted", not "durably written".
pub const ACK: &[u8] = b"Data received";

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer closed the connection
    PeerClosed,
    /// No data arrived within the idle timeout
    TimedOut,
    /// The peer reset the connection
    Reset,
    /// Some other transport-level failure occurred
    TransportError,
    /// A log write failed; the session is closed rather than retried
    WriteFailed,
}

/// One accepted connection: reads chunks, decodes them, persists decodable
/// ones and acknowledges the peer. Undecodable chunks are discarded without
/// closing the connection.
///
/// `run` consumes the session, so the stream is dropped exactly once on
/// every exit path.
pub struct Session<S, D> {
    stream: S,
    peer_ip: String,
    decoder: D,
    storage: Arc<LogStorage>,
    buffer_size: usize,
    idle_timeout: Duration,
}

impl<S, D> Session<S, D>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    D: PayloadDecoder,
{
    /// Create a session over an accepted stream
    pub fn new(
        stream: S,
        peer_ip: String,
        decoder: D,
        storage: Arc<LogStorage>,
        buffer_size: usize,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            peer_ip,
            decoder,
            storage,
            buffer_size,
            idle_timeout,
        }
    }

    /// Drive the session until it terminates
    pub async fn run(mut self) -> SessionEnd {
        let mut buf = vec![0u8; self.buffer_size];

        loop {
            let n = match timeout(self.idle_timeout, self.stream.read(&mut buf)).await {
                Err(_) => {
                    warn!(peer = %self.peer_ip, "Connection timed out, closing");
                    return SessionEnd::TimedOut;
                }
                Ok(Ok(0)) => {
                    debug!(peer = %self.peer_ip, "Peer closed connection");
                    return SessionEnd::PeerClosed;
                }
                Ok(Ok(n)) => n,
                Ok(Err(e)) if e.kind() == ErrorKind::ConnectionReset => {
                    warn!(peer = %self.peer_ip, "Connection reset by peer");
                    return SessionEnd::Reset;
                }
                Ok(Err(e)) => {
                    warn!(peer = %self.peer_ip, error = %e, "Transport error, closing session");
                    return SessionEnd::TransportError;
                }
            };

            let text = match self.decoder.decode(&buf[..n]) {
                Some(text) => text,
                None => {
                    warn!(peer = %self.peer_ip, "Received data could not be decoded, discarding chunk");
                    continue;
                }
            };

            if let Err(e) = self.storage.append(&self.peer_ip, &text).await {
                error!(peer = %self.peer_ip, error = %e, "Failed to persist chunk, closing session");
                return SessionEnd::WriteFailed;
            }

            // Ack failures are not fatal; the peer simply never sees the reply.
            if let Err(e) = self.stream.write_all(ACK).await {
                warn!(peer = %self.peer_ip, error = %e, "Failed to send acknowledgment");
            }
        }
    }
}
