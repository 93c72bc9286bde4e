use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

use crate::network::range::NetworkRange;

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    /// The interface network that shares addresses with `range`, if any.
    fn get_ipv4_net_for(&self, range: &NetworkRange) -> Option<Ipv4Network>;
    /// Sender address to use when talking to `range` from this interface.
    fn get_source_ipv4(&self, range: &NetworkRange) -> Option<Ipv4Addr>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(*ipv4)
                } else {
                    None
                }
            })
            .collect()
    }

    fn get_ipv4_net_for(&self, range: &NetworkRange) -> Option<Ipv4Network> {
        self.get_ipv4_nets()
            .into_iter()
            .find(|net| range.overlaps(net))
    }

    fn get_source_ipv4(&self, range: &NetworkRange) -> Option<Ipv4Addr> {
        self.get_ipv4_net_for(range)
            .or_else(|| {
                self.get_ipv4_nets()
                    .into_iter()
                    .find(|net| !net.ip().is_loopback())
            })
            .map(|net| net.ip())
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
