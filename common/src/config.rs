use std::time::Duration;

use crate::error::ScanError;

pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_CONCURRENCY: usize = 256;

/// Engine tuning shared by the discoverer and the port scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// How long the discoverer keeps collecting resolution replies.
    pub discovery_timeout: Duration,
    /// Timeout owned by every single connection attempt.
    pub connect_timeout: Duration,
    /// Upper bound on simultaneously open probe sockets.
    pub max_concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.discovery_timeout.is_zero() {
            return Err(ScanError::Config("discovery timeout must be positive".into()));
        }
        if self.connect_timeout.is_zero() {
            return Err(ScanError::Config("connect timeout must be positive".into()));
        }
        if self.max_concurrency == 0 {
            return Err(ScanError::Config("concurrency must be at least 1".into()));
        }
        Ok(())
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
