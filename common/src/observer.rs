//! The notification channel between the engine and whoever drives it.
//!
//! The engine never prints. Every status change, progress tick, warning and
//! contained failure is handed to a caller-supplied [`ScanObserver`] as a
//! [`ScanEvent`]; each event renders to a human-readable message through
//! [`Display`](fmt::Display).

use std::fmt;
use std::net::Ipv4Addr;

use tracing::{debug, error, info, warn};

use crate::network::host::HardwareAddress;
use crate::network::range::NetworkRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Status,
    Progress,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    DiscoveryStarted {
        range: NetworkRange,
        interface: String,
    },
    HostFound {
        address: Ipv4Addr,
        hardware_address: HardwareAddress,
        found: usize,
    },
    DiscoveryFinished {
        hosts: usize,
    },
    /// Discovery could not run at all; distinct from finding nothing.
    DiscoveryUnauthorized {
        reason: String,
    },
    LocalHostAdded {
        address: Ipv4Addr,
    },
    LocalHostUnresolved {
        reason: String,
    },
    PortScanStarted {
        hosts: usize,
        ports: usize,
    },
    HostScanned {
        completed: usize,
        total: usize,
        address: Ipv4Addr,
        open_ports: usize,
    },
    ProbeFailed {
        address: Ipv4Addr,
        port: u16,
        reason: String,
    },
    PortScanFinished {
        open_ports: usize,
    },
}

impl ScanEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DiscoveryStarted { .. } | Self::PortScanStarted { .. } => Severity::Status,
            Self::HostFound { .. } | Self::HostScanned { .. } => Severity::Progress,
            Self::DiscoveryFinished { .. }
            | Self::LocalHostAdded { .. }
            | Self::PortScanFinished { .. } => Severity::Success,
            Self::LocalHostUnresolved { .. } => Severity::Warning,
            Self::DiscoveryUnauthorized { .. } | Self::ProbeFailed { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscoveryStarted { range, interface } => {
                write!(f, "Scanning network {range} on {interface}")
            }
            Self::HostFound { address, hardware_address, found } => {
                write!(f, "Found {address} ({hardware_address}), {found} so far")
            }
            Self::DiscoveryFinished { hosts } => write!(f, "Discovery found {hosts} host(s)"),
            Self::DiscoveryUnauthorized { reason } => {
                write!(f, "Discovery requires root privileges ({reason})")
            }
            Self::LocalHostAdded { address } => {
                write!(f, "Adding the local machine ({address}) to the scan")
            }
            Self::LocalHostUnresolved { reason } => {
                write!(f, "Could not determine the local address: {reason}")
            }
            Self::PortScanStarted { hosts, ports } => {
                write!(f, "Probing {ports} port(s) on {hosts} host(s)")
            }
            Self::HostScanned { completed, total, address, open_ports } => {
                write!(f, "Scanned {address} ({completed}/{total}), {open_ports} open")
            }
            Self::ProbeFailed { address, port, reason } => {
                write!(f, "Connection error on {address}:{port} - {reason}")
            }
            Self::PortScanFinished { open_ports } => {
                write!(f, "Port scan complete, {open_ports} open port(s) in total")
            }
        }
    }
}

/// Sink for engine notifications.
pub trait ScanObserver: Send + Sync {
    fn notify(&self, event: ScanEvent);
}

impl<F> ScanObserver for F
where
    F: Fn(ScanEvent) + Send + Sync,
{
    fn notify(&self, event: ScanEvent) {
        self(event)
    }
}

/// Discards every event.
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn notify(&self, _event: ScanEvent) {}
}

/// Forwards events to `tracing`, mapping severity to level.
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn notify(&self, event: ScanEvent) {
        match event.severity() {
            Severity::Error => error!("{event}"),
            Severity::Warning => warn!("{event}"),
            Severity::Status | Severity::Success => info!("{event}"),
            Severity::Progress => debug!("{event}"),
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_act_as_observers() {
        let seen: Mutex<Vec<ScanEvent>> = Mutex::new(Vec::new());
        let observer = |event: ScanEvent| seen.lock().unwrap().push(event);
        observer.notify(ScanEvent::DiscoveryFinished { hosts: 2 });
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[ScanEvent::DiscoveryFinished { hosts: 2 }]
        );
    }

    #[test]
    fn progress_message_carries_index_and_total() {
        let event = ScanEvent::HostScanned {
            completed: 2,
            total: 5,
            address: Ipv4Addr::new(192, 168, 1, 20),
            open_ports: 0,
        };
        assert_eq!(event.to_string(), "Scanned 192.168.1.20 (2/5), 0 open");
        assert_eq!(event.severity(), Severity::Progress);
    }

    #[test]
    fn probe_failures_are_errors_and_unresolved_local_is_warning() {
        let failed = ScanEvent::ProbeFailed {
            address: Ipv4Addr::new(10, 0, 0, 1),
            port: 22,
            reason: "network unreachable".into(),
        };
        assert_eq!(failed.severity(), Severity::Error);
        assert_eq!(failed.to_string(), "Connection error on 10.0.0.1:22 - network unreachable");

        let unresolved = ScanEvent::LocalHostUnresolved { reason: "no route".into() };
        assert_eq!(unresolved.severity(), Severity::Warning);
    }
}
