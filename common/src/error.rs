use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures that abort the requested operation.
///
/// Per-probe transport failures are not part of this taxonomy; they travel as
/// a probe outcome and never escalate.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Malformed network specification, caught before the engine runs.
    #[error("invalid network range '{input}': {reason}")]
    InvalidRange { input: String, reason: String },

    /// Malformed port specification, caught before the port scan runs.
    #[error("invalid port list '{input}': {reason}")]
    InvalidPortList { input: String, reason: String },

    /// Link-layer access was refused to the current process.
    #[error("link-layer access denied: {0}")]
    PermissionDenied(String),

    /// No local interface can reach the requested range.
    #[error("no usable network interface for {0}")]
    Interface(String),

    #[error("datalink channel failure on {interface}")]
    Channel {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The results could not be persisted. The in-memory results stay valid.
    #[error("failed to export results to {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ScanError {
    pub fn invalid_range(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_ports(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPortList {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
