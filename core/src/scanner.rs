//! Bounded concurrent TCP port scanning over discovered hosts.
//!
//! Every `(host, port)` pair becomes one probe task. A shared semaphore caps how
//! many probes are in flight at once, so a /16 with the default port list never
//! opens more sockets than [`ScanConfig::max_concurrency`] allows. Results are
//! folded back into the hosts they belong to; one host's failures never affect
//! another's.

use std::collections::{BTreeSet, HashMap};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;

use lansweep_common::config::ScanConfig;
use lansweep_common::network::host::Host;
use lansweep_common::network::ports::PortList;
use lansweep_common::observer::{ScanEvent, ScanObserver};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::network::tcp::{ProbeError, ProbeOutcome, Prober, TcpProber};

pub struct PortScanner<P = TcpProber> {
    prober: Arc<P>,
    connect_timeout: Duration,
    max_concurrency: usize,
}

impl PortScanner<TcpProber> {
    pub fn new(config: &ScanConfig) -> Self {
        Self::with_prober(TcpProber, config)
    }
}

impl<P: Prober + 'static> PortScanner<P> {
    pub fn with_prober(prober: P, config: &ScanConfig) -> Self {
        Self {
            prober: Arc::new(prober),
            connect_timeout: config.connect_timeout,
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    /// Probes every port of `ports` on every host and records the open ones.
    ///
    /// Each host ends with `open_ports` set, possibly to an empty set. Transport
    /// errors are reported through `observer` and count as not open.
    pub async fn scan(&self, hosts: &mut [Host], ports: &PortList, observer: &dyn ScanObserver) {
        if hosts.is_empty() {
            return;
        }

        let total = hosts.len();
        observer.notify(ScanEvent::PortScanStarted {
            hosts: total,
            ports: ports.len(),
        });

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let port_list: Arc<[u16]> = Arc::from(ports.as_slice());

        let mut tasks = JoinSet::new();
        let mut index_of = HashMap::with_capacity(total);
        for (idx, host) in hosts.iter().enumerate() {
            let handle = tasks.spawn(scan_host(
                self.prober.clone(),
                host.address,
                port_list.clone(),
                semaphore.clone(),
                self.connect_timeout,
            ));
            index_of.insert(handle.id(), idx);
        }

        let mut completed: usize = 0;
        let mut open_total: usize = 0;

        while let Some(joined) = tasks.join_next_with_id().await {
            completed += 1;
            let (id, report) = match joined {
                Ok((id, report)) => (id, report),
                Err(e) => {
                    warn!("Host scan task failed: {e}");
                    let Some(&idx) = index_of.get(&e.id()) else {
                        continue;
                    };
                    (e.id(), HostReport::empty(hosts[idx].address))
                }
            };
            let Some(&idx) = index_of.get(&id) else {
                continue;
            };

            for (port, err) in &report.failures {
                observer.notify(ScanEvent::ProbeFailed {
                    address: report.address,
                    port: *port,
                    reason: err.to_string(),
                });
            }

            open_total += report.open.len();
            observer.notify(ScanEvent::HostScanned {
                completed,
                total,
                address: report.address,
                open_ports: report.open.len(),
            });
            hosts[idx].open_ports = Some(report.open);
        }

        observer.notify(ScanEvent::PortScanFinished {
            open_ports: open_total,
        });
    }
}

struct HostReport {
    address: Ipv4Addr,
    open: BTreeSet<u16>,
    failures: Vec<(u16, ProbeError)>,
}

impl HostReport {
    fn empty(address: Ipv4Addr) -> Self {
        Self {
            address,
            open: BTreeSet::new(),
            failures: Vec::new(),
        }
    }
}

async fn scan_host<P: Prober + 'static>(
    prober: Arc<P>,
    address: Ipv4Addr,
    ports: Arc<[u16]>,
    semaphore: Arc<Semaphore>,
    connect_timeout: Duration,
) -> HostReport {
    let mut probes = JoinSet::new();

    for &port in ports.iter() {
        // A permit is held for the whole lifetime of the probe.
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let prober = prober.clone();
        probes.spawn(async move {
            let outcome = prober
                .probe(SocketAddrV4::new(address, port), connect_timeout)
                .await;
            drop(permit);
            (port, outcome)
        });
    }

    let mut report = HostReport::empty(address);
    while let Some(joined) = probes.join_next().await {
        match joined {
            Ok((port, ProbeOutcome::Open)) => {
                report.open.insert(port);
            }
            Ok((_, ProbeOutcome::Closed)) => {}
            Ok((port, ProbeOutcome::Error(err))) => {
                debug!("{address}:{port} probe error: {err}");
                report.failures.push((port, err));
            }
            Err(e) => warn!("Probe task on {address} failed: {e}"),
        }
    }
    report.failures.sort_by_key(|(port, _)| *port);
    report
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
