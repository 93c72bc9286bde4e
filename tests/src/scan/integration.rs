#![cfg(test)]
use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lansweep_common::config::ScanConfig;
use lansweep_common::network::host::{HardwareAddress, Host};
use lansweep_common::network::ports::PortList;
use lansweep_common::network::range::NetworkRange;
use lansweep_common::observer::{NoopObserver, ScanEvent, ScanObserver};
use lansweep_common::ScanError;
use lansweep_core::discovery::HostDiscoverer;
use lansweep_core::export;
use lansweep_core::scanner::PortScanner;
use lansweep_core::system::RouteResolver;
use lansweep_core::{DiscoveryStatus, ScanCoordinator, ScanRequest};
use pnet::util::MacAddr;
use tokio::net::TcpListener;

/// Stands in for ARP: answers with a fixed host list or a privilege error.
struct StaticDiscoverer {
    hosts: Option<Vec<Host>>,
}

#[async_trait]
impl HostDiscoverer for StaticDiscoverer {
    async fn discover(
        &self,
        _range: &NetworkRange,
        _timeout: Duration,
        _observer: &dyn ScanObserver,
    ) -> Result<Vec<Host>, ScanError> {
        match &self.hosts {
            Some(hosts) => Ok(hosts.clone()),
            None => Err(ScanError::PermissionDenied("not root".into())),
        }
    }
}

fn loopback_range() -> NetworkRange {
    "127.0.0.0/8".parse().unwrap()
}

fn config() -> ScanConfig {
    ScanConfig {
        connect_timeout: Duration::from_millis(300),
        max_concurrency: 8,
        ..ScanConfig::default()
    }
}

fn coordinator(hosts: Option<Vec<Host>>, config: &ScanConfig) -> ScanCoordinator {
    ScanCoordinator::with_components(
        Box::new(StaticDiscoverer { hosts }),
        PortScanner::new(config),
        Box::new(RouteResolver),
        config,
    )
}

async fn open_port() -> (TcpListener, u16) {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

async fn closed_port() -> u16 {
    let (listener, port) = open_port().await;
    drop(listener);
    port
}

#[tokio::test]
async fn loopback_host_reports_only_listening_ports() {
    let (_listener, open) = open_port().await;
    let closed = closed_port().await;
    let loopback =
        Host::new(Ipv4Addr::LOCALHOST).with_mac(MacAddr::new(0x02, 0, 0, 0, 0, 0x01));
    let request = ScanRequest::new(loopback_range())
        .with_ports(PortList::new([open, closed]).unwrap())
        .include_self(false);

    let report = coordinator(Some(vec![loopback]), &config())
        .run(&request, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(report.discovery, DiscoveryStatus::Completed);
    assert_eq!(report.hosts.len(), 1);
    assert_eq!(report.hosts[0].open_ports, Some(BTreeSet::from([open])));
}

#[tokio::test]
async fn local_machine_is_injected_and_scanned() {
    let (_listener, open) = open_port().await;
    let request = ScanRequest::new(loopback_range()).with_ports(PortList::new([open]).unwrap());
    let events = Mutex::new(Vec::new());
    let observer = |e: ScanEvent| events.lock().unwrap().push(e);

    let report = coordinator(Some(Vec::new()), &config())
        .run(&request, &observer)
        .await
        .unwrap();

    assert_eq!(report.hosts.len(), 1);
    let local = &report.hosts[0];
    assert!(local.address.is_loopback());
    assert_eq!(local.hardware_address, HardwareAddress::Unknown);
    assert_eq!(local.open_ports, Some(BTreeSet::from([open])));
    assert!(events
        .into_inner()
        .unwrap()
        .iter()
        .any(|e| matches!(e, ScanEvent::LocalHostAdded { .. })));
}

#[tokio::test]
async fn unauthorized_discovery_still_scans_local_machine() {
    let (_listener, open) = open_port().await;
    let request = ScanRequest::new(loopback_range()).with_ports(PortList::new([open]).unwrap());

    let report = coordinator(None, &config())
        .run(&request, &NoopObserver)
        .await
        .unwrap();

    assert!(report.is_unauthorized());
    assert_eq!(report.hosts.len(), 1);
    assert!(report.hosts[0].is_scanned());
}

#[tokio::test]
async fn unauthorized_discovery_without_port_scan_is_empty() {
    let report = coordinator(None, &config())
        .run(&ScanRequest::new(loopback_range()), &NoopObserver)
        .await
        .unwrap();

    assert!(report.is_unauthorized());
    assert!(report.hosts.is_empty());
}

#[tokio::test]
async fn serial_probing_finds_every_listener() {
    let mut listeners = Vec::new();
    let mut ports = Vec::new();
    for _ in 0..4 {
        let (listener, port) = open_port().await;
        listeners.push(listener);
        ports.push(port);
    }
    ports.push(closed_port().await);

    let serial = ScanConfig {
        max_concurrency: 1,
        ..config()
    };
    let hosts = vec![Host::new(Ipv4Addr::LOCALHOST)];
    let request = ScanRequest::new(loopback_range())
        .with_ports(PortList::new(ports.iter().copied()).unwrap())
        .include_self(false);

    let report = coordinator(Some(hosts), &serial)
        .run(&request, &NoopObserver)
        .await
        .unwrap();

    let expected: BTreeSet<u16> = ports[..4].iter().copied().collect();
    assert_eq!(report.hosts[0].open_ports, Some(expected));
}

#[tokio::test]
async fn report_exports_to_csv() {
    let (_listener, open) = open_port().await;
    let request = ScanRequest::new(loopback_range())
        .with_ports(PortList::new([open]).unwrap())
        .include_self(false);

    let report = coordinator(Some(vec![Host::new(Ipv4Addr::LOCALHOST)]), &config())
        .run(&request, &NoopObserver)
        .await
        .unwrap();
    let csv = export::to_csv_string(&report.hosts).unwrap();

    assert_eq!(
        csv,
        format!("ip,mac,open_ports\n127.0.0.1,unknown,{open}\n")
    );
}
