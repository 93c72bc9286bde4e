//! A **local area network (LAN)** discoverer.
//!
//! Broadcasts one ARP request per address of the target range and collects the
//! replies that arrive before the discovery window closes.
//!
//! This discoverer requires **root privileges** to construct and intercept raw
//! Layer 2 frames via the operating system's network sockets.

use std::collections::HashSet;
use std::io;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pnet::util::MacAddr;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, trace, warn};

use lansweep_common::{
    ScanError,
    network::{host::Host, interface, range::NetworkRange},
    observer::{ScanEvent, ScanObserver},
    utils::interface::NetworkInterfaceExtension,
};

use crate::network::arp;
use crate::network::datalink::{self, EthernetHandle};

use super::HostDiscoverer;

#[derive(Debug, Default, Clone, Copy)]
pub struct ArpDiscoverer;

impl ArpDiscoverer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostDiscoverer for ArpDiscoverer {
    async fn discover(
        &self,
        range: &NetworkRange,
        timeout: Duration,
        observer: &dyn ScanObserver,
    ) -> Result<Vec<Host>, ScanError> {
        ensure_privileged()?;

        let intf = interface::find_for_range(range)
            .ok_or_else(|| ScanError::Interface(range.to_string()))?;
        let src_mac = intf
            .mac
            .ok_or_else(|| ScanError::Interface(format!("{range} ({} has no MAC address)", intf.name)))?;
        let src_addr = intf
            .get_source_ipv4(range)
            .ok_or_else(|| ScanError::Interface(format!("{range} ({} has no IPv4 address)", intf.name)))?;
        let handle = datalink::open_channel(&intf)?;

        debug!("Sweeping {range} from {} ({src_addr}, {src_mac})", intf.name);
        observer.notify(ScanEvent::DiscoveryStarted {
            range: *range,
            interface: intf.name.clone(),
        });

        let sweep = ArpSweep {
            interface: intf.name.clone(),
            range: *range,
            src_mac,
            src_addr,
            timeout,
        };
        let (found_tx, mut found_rx) = mpsc::unbounded_channel::<Host>();
        let worker = tokio::task::spawn_blocking(move || sweep.run(handle, found_tx));

        let mut found: usize = 0;
        while let Some(host) = found_rx.recv().await {
            found += 1;
            observer.notify(ScanEvent::HostFound {
                address: host.address,
                hardware_address: host.hardware_address,
                found,
            });
        }

        worker.await.map_err(|e| ScanError::Channel {
            interface: intf.name.clone(),
            source: io::Error::other(e),
        })?
    }
}

fn ensure_privileged() -> Result<(), ScanError> {
    if is_root::is_root() {
        Ok(())
    } else {
        Err(ScanError::PermissionDenied(
            "raw ARP frames require root privileges".to_string(),
        ))
    }
}

/// One blocking send-then-collect cycle over a datalink channel.
struct ArpSweep {
    interface: String,
    range: NetworkRange,
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    timeout: Duration,
}

impl ArpSweep {
    fn run(
        self,
        mut handle: EthernetHandle,
        found_tx: UnboundedSender<Host>,
    ) -> Result<Vec<Host>, ScanError> {
        self.send_requests(&mut handle)?;

        let mut collector = ReplyCollector::new(self.range);
        let deadline = Instant::now() + self.timeout;

        while Instant::now() < deadline && !collector.is_complete() {
            match handle.rx.next() {
                Ok(frame) => {
                    let Some(host) = collector.offer(frame) else {
                        continue;
                    };
                    if found_tx.send(host.clone()).is_err() {
                        debug!("listener gone, stopping collection on {}", self.interface);
                        break;
                    }
                }
                Err(e) => trace!("receive on {}: {e}", self.interface),
            }
        }

        Ok(collector.finish())
    }

    fn send_requests(&self, handle: &mut EthernetHandle) -> Result<(), ScanError> {
        let mut failures: usize = 0;

        for dst_addr in self.range.iter() {
            let packet = arp::create_request(self.src_mac, self.src_addr, dst_addr).map_err(|e| {
                ScanError::Channel {
                    interface: self.interface.clone(),
                    source: io::Error::other(e.to_string()),
                }
            })?;

            if let Some(Err(e)) = handle.tx.send_to(&packet, None) {
                if e.kind() == io::ErrorKind::PermissionDenied {
                    return Err(ScanError::PermissionDenied(format!(
                        "sending on {}: {e}",
                        self.interface
                    )));
                }
                debug!("send {dst_addr} failed: {e}");
                failures += 1;
            }
        }

        if failures > 0 {
            warn!("{failures} ARP request(s) on {} could not be sent", self.interface);
        }
        Ok(())
    }
}

/// Turns raw frames into hosts: in-range ARP replies only, first reply per address wins.
pub(crate) struct ReplyCollector {
    range: NetworkRange,
    seen: HashSet<Ipv4Addr>,
    hosts: Vec<Host>,
}

impl ReplyCollector {
    pub(crate) fn new(range: NetworkRange) -> Self {
        Self {
            range,
            seen: HashSet::new(),
            hosts: Vec::new(),
        }
    }

    /// Returns the host when `frame` introduces a new address.
    pub(crate) fn offer(&mut self, frame: &[u8]) -> Option<&Host> {
        let reply = arp::parse_reply(frame).ok()?;
        if !self.range.contains(reply.sender_addr) {
            return None;
        }
        if !self.seen.insert(reply.sender_addr) {
            return None;
        }
        self.hosts
            .push(Host::new(reply.sender_addr).with_mac(reply.sender_mac));
        self.hosts.last()
    }

    /// Every address of the range has answered.
    pub(crate) fn is_complete(&self) -> bool {
        self.hosts.len() as u64 >= self.range.len()
    }

    pub(crate) fn finish(self) -> Vec<Host> {
        self.hosts
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
    use crate::network::arp::tests::{build_arp_frame, reply_frame};
    use crate::network::arp::ARP_LEN;
    use pnet::datalink::{DataLinkReceiver, DataLinkSender, NetworkInterface};
    use pnet::packet::arp::ArpOperations;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    const MAC_A: MacAddr = MacAddr(0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa);
    const MAC_B: MacAddr = MacAddr(0xbb, 0xbb, 0xbb, 0xbb, 0xbb, 0xbb);
    const MAC_C: MacAddr = MacAddr(0xcc, 0xcc, 0xcc, 0xcc, 0xcc, 0xcc);

    // ---- Fake datalink endpoints ----
    struct FakeSender {
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
        error: Option<io::ErrorKind>,
    }

    impl DataLinkSender for FakeSender {
        fn build_and_send(
            &mut self,
            _num_packets: usize,
            _packet_size: usize,
            _func: &mut dyn for<'a> FnMut(&'a mut [u8]),
        ) -> Option<io::Result<()>> {
            Some(Ok(()))
        }

        fn send_to(
            &mut self,
            packet: &[u8],
            _dst: Option<NetworkInterface>,
        ) -> Option<io::Result<()>> {
            self.sent.lock().unwrap().push(packet.to_vec());
            match self.error {
                Some(kind) => Some(Err(io::Error::from(kind))),
                None => Some(Ok(())),
            }
        }
    }

    struct FakeReceiver {
        frames: VecDeque<Vec<u8>>,
        current: Vec<u8>,
    }

    impl DataLinkReceiver for FakeReceiver {
        fn next(&mut self) -> io::Result<&[u8]> {
            match self.frames.pop_front() {
                Some(frame) => {
                    self.current = frame;
                    Ok(&self.current)
                }
                None => {
                    std::thread::sleep(Duration::from_millis(5));
                    Err(io::Error::from(io::ErrorKind::TimedOut))
                }
            }
        }
    }

    fn fake_handle(
        frames: Vec<Vec<u8>>,
        error: Option<io::ErrorKind>,
    ) -> (EthernetHandle, Arc<Mutex<Vec<Vec<u8>>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let handle = EthernetHandle {
            tx: Box::new(FakeSender { sent: sent.clone(), error }),
            rx: Box::new(FakeReceiver {
                frames: frames.into(),
                current: Vec::new(),
            }),
        };
        (handle, sent)
    }

    fn sweep(range: &str) -> ArpSweep {
        ArpSweep {
            interface: "test0".into(),
            range: range.parse().unwrap(),
            src_mac: MacAddr::new(0x10, 0x20, 0x30, 0x40, 0x50, 0x60),
            src_addr: Ipv4Addr::new(192, 168, 1, 2),
            timeout: Duration::from_millis(200),
        }
    }

    fn ip(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 1, last)
    }

    #[test]
    fn collector_keeps_first_reply_per_address() {
        let mut collector = ReplyCollector::new("192.168.1.0/24".parse().unwrap());
        assert!(collector.offer(&reply_frame(ip(10), MAC_A)).is_some());
        assert!(collector.offer(&reply_frame(ip(20), MAC_B)).is_some());
        assert!(collector.offer(&reply_frame(ip(10), MAC_C)).is_none());

        let hosts = collector.finish();
        assert_eq!(
            hosts,
            vec![
                Host::new(ip(10)).with_mac(MAC_A),
                Host::new(ip(20)).with_mac(MAC_B),
            ]
        );
    }

    #[test]
    fn collector_preserves_arrival_order() {
        let mut collector = ReplyCollector::new("192.168.1.0/24".parse().unwrap());
        collector.offer(&reply_frame(ip(200), MAC_A));
        collector.offer(&reply_frame(ip(3), MAC_B));
        let order: Vec<Ipv4Addr> = collector.finish().iter().map(|h| h.address).collect();
        assert_eq!(order, vec![ip(200), ip(3)]);
    }

    #[test]
    fn collector_ignores_out_of_range_and_requests() {
        let mut collector = ReplyCollector::new("192.168.1.0/24".parse().unwrap());
        assert!(collector.offer(&reply_frame(Ipv4Addr::new(10, 0, 0, 9), MAC_A)).is_none());
        let request = build_arp_frame(ip(7), MAC_B, ArpOperations::Request, ARP_LEN);
        assert!(collector.offer(&request).is_none());
        assert!(collector.offer(&[0u8; 4]).is_none());
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn collector_completes_when_every_address_answered() {
        let mut collector = ReplyCollector::new("192.168.1.10/31".parse().unwrap());
        collector.offer(&reply_frame(ip(10), MAC_A));
        assert!(!collector.is_complete());
        collector.offer(&reply_frame(ip(11), MAC_B));
        assert!(collector.is_complete());
    }

    #[test]
    fn sweep_sends_once_per_address_and_collects_unique_replies() {
        let frames = vec![
            reply_frame(ip(1), MAC_A),
            build_arp_frame(ip(2), MAC_C, ArpOperations::Request, ARP_LEN),
            reply_frame(ip(2), MAC_B),
            reply_frame(ip(1), MAC_C),
            reply_frame(Ipv4Addr::new(10, 0, 0, 9), MAC_C),
        ];
        let (handle, sent) = fake_handle(frames, None);
        let (found_tx, mut found_rx) = mpsc::unbounded_channel();

        let hosts = sweep("192.168.1.0/30").run(handle, found_tx).unwrap();

        assert_eq!(sent.lock().unwrap().len(), 4);
        assert_eq!(
            hosts,
            vec![Host::new(ip(1)).with_mac(MAC_A), Host::new(ip(2)).with_mac(MAC_B)]
        );
        assert_eq!(found_rx.try_recv().unwrap().address, ip(1));
        assert_eq!(found_rx.try_recv().unwrap().address, ip(2));
        assert!(found_rx.try_recv().is_err());
    }

    #[test]
    fn sweep_with_no_replies_is_empty_not_error() {
        let (handle, _sent) = fake_handle(Vec::new(), None);
        let (found_tx, _found_rx) = mpsc::unbounded_channel();
        let hosts = sweep("192.168.1.0/30").run(handle, found_tx).unwrap();
        assert!(hosts.is_empty());
    }

    #[test]
    fn sweep_send_permission_error_aborts_without_results() {
        let frames = vec![reply_frame(ip(1), MAC_A)];
        let (handle, sent) = fake_handle(frames, Some(io::ErrorKind::PermissionDenied));
        let (found_tx, mut found_rx) = mpsc::unbounded_channel();

        let err = sweep("192.168.1.0/30").run(handle, found_tx).unwrap_err();

        assert!(err.is_permission_denied());
        assert_eq!(sent.lock().unwrap().len(), 1);
        assert!(found_rx.try_recv().is_err());
    }

    #[test]
    fn sweep_tolerates_individual_send_failures() {
        let frames = vec![reply_frame(ip(3), MAC_A)];
        let (handle, sent) = fake_handle(frames, Some(io::ErrorKind::Other));
        let (found_tx, _found_rx) = mpsc::unbounded_channel();

        let hosts = sweep("192.168.1.0/30").run(handle, found_tx).unwrap();

        assert_eq!(sent.lock().unwrap().len(), 4);
        assert_eq!(hosts.len(), 1);
    }

    #[test]
    fn sweep_stops_when_listener_is_gone() {
        let frames = vec![reply_frame(ip(1), MAC_A)];
        let (handle, _sent) = fake_handle(frames, None);
        let (found_tx, found_rx) = mpsc::unbounded_channel();
        drop(found_rx);
        let sweep = ArpSweep {
            timeout: Duration::from_secs(5),
            ..sweep("192.168.1.0/30")
        };

        let started = Instant::now();
        let hosts = sweep.run(handle, found_tx).unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(hosts, vec![Host::new(ip(1)).with_mac(MAC_A)]);
    }

    #[tokio::test]
    async fn discover_without_root_is_unauthorized() {
        if is_root::is_root() {
            return;
        }
        let range: NetworkRange = "192.168.1.0/30".parse().unwrap();
        let result = ArpDiscoverer::new()
            .discover(&range, Duration::from_millis(100), &lansweep_common::observer::NoopObserver)
            .await;
        assert!(matches!(result, Err(ScanError::PermissionDenied(_))));
    }
}
