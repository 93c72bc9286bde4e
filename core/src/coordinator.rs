//! # Scan Coordinator
//!
//! Sequences one full run: discovery first, then (optionally) the local machine
//! is added and every host is port scanned. The result is sorted by address.
//!
//! Missing privileges during discovery do not abort a run. The report carries
//! [`DiscoveryStatus::Unauthorized`] and an empty host list so the caller can
//! tell "could not look" apart from "nobody answered".

use std::time::Duration;

use lansweep_common::ScanError;
use lansweep_common::config::ScanConfig;
use lansweep_common::network::host::Host;
use lansweep_common::network::ports::PortList;
use lansweep_common::network::range::NetworkRange;
use lansweep_common::observer::{ScanEvent, ScanObserver};
use tracing::debug;

use crate::discovery::{ArpDiscoverer, HostDiscoverer};
use crate::network::tcp::{Prober, TcpProber};
use crate::scanner::PortScanner;
use crate::system::{LocalAddressResolver, RouteResolver};

/// What a single run should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub range: NetworkRange,
    pub scan_ports: bool,
    pub ports: PortList,
    /// Add the local machine when port scanning, even if it never answered discovery.
    pub include_self: bool,
}

impl ScanRequest {
    pub fn new(range: NetworkRange) -> Self {
        Self {
            range,
            scan_ports: false,
            ports: PortList::default(),
            include_self: true,
        }
    }

    pub fn with_ports(mut self, ports: PortList) -> Self {
        self.scan_ports = true;
        self.ports = ports;
        self
    }

    pub fn scan_ports(mut self, enabled: bool) -> Self {
        self.scan_ports = enabled;
        self
    }

    pub fn include_self(mut self, enabled: bool) -> Self {
        self.include_self = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStatus {
    Completed,
    /// Discovery was not attempted for lack of privileges.
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Sorted by address.
    pub hosts: Vec<Host>,
    pub discovery: DiscoveryStatus,
}

impl ScanReport {
    pub fn is_unauthorized(&self) -> bool {
        self.discovery == DiscoveryStatus::Unauthorized
    }
}

pub struct ScanCoordinator<P = TcpProber> {
    discoverer: Box<dyn HostDiscoverer>,
    scanner: PortScanner<P>,
    resolver: Box<dyn LocalAddressResolver>,
    discovery_timeout: Duration,
}

impl ScanCoordinator<TcpProber> {
    /// ARP discovery, TCP connect probes and route-based self lookup.
    pub fn new(config: &ScanConfig) -> Self {
        Self::with_components(
            Box::new(ArpDiscoverer::new()),
            PortScanner::new(config),
            Box::new(RouteResolver),
            config,
        )
    }
}

impl<P: Prober + 'static> ScanCoordinator<P> {
    pub fn with_components(
        discoverer: Box<dyn HostDiscoverer>,
        scanner: PortScanner<P>,
        resolver: Box<dyn LocalAddressResolver>,
        config: &ScanConfig,
    ) -> Self {
        Self {
            discoverer,
            scanner,
            resolver,
            discovery_timeout: config.discovery_timeout,
        }
    }

    pub async fn run(
        &self,
        request: &ScanRequest,
        observer: &dyn ScanObserver,
    ) -> Result<ScanReport, ScanError> {
        let (mut hosts, discovery) = match self
            .discoverer
            .discover(&request.range, self.discovery_timeout, observer)
            .await
        {
            Ok(hosts) => {
                observer.notify(ScanEvent::DiscoveryFinished { hosts: hosts.len() });
                (hosts, DiscoveryStatus::Completed)
            }
            Err(ScanError::PermissionDenied(reason)) => {
                observer.notify(ScanEvent::DiscoveryUnauthorized { reason });
                (Vec::new(), DiscoveryStatus::Unauthorized)
            }
            Err(e) => return Err(e),
        };

        if request.scan_ports {
            if request.include_self {
                self.add_local_host(&mut hosts, &request.range, observer);
            }
            self.scanner.scan(&mut hosts, &request.ports, observer).await;
        }

        hosts.sort_by_key(|host| host.address);
        debug!("Run over {} finished with {} host(s)", request.range, hosts.len());

        Ok(ScanReport { hosts, discovery })
    }

    fn add_local_host(&self, hosts: &mut Vec<Host>, range: &NetworkRange, observer: &dyn ScanObserver) {
        match self.resolver.resolve(range) {
            Ok(address) if hosts.iter().any(|h| h.address == address) => {
                debug!("Local address {address} already discovered");
            }
            Ok(address) => {
                observer.notify(ScanEvent::LocalHostAdded { address });
                hosts.push(Host::new(address));
            }
            Err(e) => observer.notify(ScanEvent::LocalHostUnresolved {
                reason: format!("{e:#}"),
            }),
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
