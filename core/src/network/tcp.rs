//! A single timeout-bounded TCP connect against one `(host, port)` pair.

use std::io;
use std::net::SocketAddrV4;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Transport failure that is neither a refusal nor a timeout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProbeError {
    pub kind: io::ErrorKind,
    pub message: String,
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The handshake completed.
    Open,
    /// Refused, reset or timed out.
    Closed,
    Error(ProbeError),
}

impl ProbeOutcome {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

#[async_trait]
pub trait Prober: Send + Sync {
    /// Attempts one connection. The timeout belongs to this attempt only.
    async fn probe(&self, target: SocketAddrV4, connect_timeout: Duration) -> ProbeOutcome;
}

/// Full-handshake connect prober.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: SocketAddrV4, connect_timeout: Duration) -> ProbeOutcome {
        let outcome = match timeout(connect_timeout, TcpStream::connect(target)).await {
            Ok(Ok(mut stream)) => {
                if let Err(e) = stream.shutdown().await {
                    trace!("Shutdown stream error on {target}: {e}");
                }
                ProbeOutcome::Open
            }
            Ok(Err(e)) => classify(e),
            Err(_elapsed) => ProbeOutcome::Closed,
        };
        debug!("{target} -> {outcome:?}");
        outcome
    }
}

/// Sorts a failed connect into closed or error.
pub fn classify(err: io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::TimedOut => ProbeOutcome::Closed,
        _ => ProbeOutcome::Error(ProbeError::from(err)),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
