//! Facts about the machine running the scan.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use anyhow::{Context, bail};
use lansweep_common::network::range::NetworkRange;

/// Port used only to give the routing table a destination. Nothing is sent.
const DISCARD_PORT: u16 = 9;

/// Finds the machine's own IPv4 address on the way to `range`.
pub trait LocalAddressResolver: Send + Sync {
    fn resolve(&self, range: &NetworkRange) -> anyhow::Result<Ipv4Addr>;
}

/// Asks the kernel which source address it would route a datagram from.
///
/// Connecting a UDP socket selects a route and binds a local address without
/// putting a packet on the wire.
#[derive(Debug, Default, Clone, Copy)]
pub struct RouteResolver;

impl LocalAddressResolver for RouteResolver {
    fn resolve(&self, range: &NetworkRange) -> anyhow::Result<Ipv4Addr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .context("failed to bind a probe socket")?;
        let target = range.first_host();
        socket
            .connect((target, DISCARD_PORT))
            .with_context(|| format!("no route towards {target}"))?;

        match socket.local_addr()?.ip() {
            IpAddr::V4(addr) if !addr.is_unspecified() => Ok(addr),
            IpAddr::V4(_) => bail!("kernel selected no source address for {range}"),
            IpAddr::V6(addr) => bail!("expected an IPv4 source address, got {addr}"),
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

    #[test]
    fn loopback_range_resolves_to_loopback() {
        let range: NetworkRange = "127.0.0.0/8".parse().unwrap();
        let addr = RouteResolver.resolve(&range).unwrap();
        assert!(addr.is_loopback());
    }
}
