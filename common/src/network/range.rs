//! # Network Range Model
//!
//! A validated IPv4 CIDR block. Parsing is non-strict: host bits are masked
//! off, so `192.168.1.1/24` and `192.168.1.0/24` describe the same range.
//! A bare address is treated as a `/32`.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkRange {
    network: Ipv4Network,
}

impl NetworkRange {
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, ScanError> {
        let raw = Ipv4Network::new(addr, prefix)
            .map_err(|e| ScanError::invalid_range(&format!("{addr}/{prefix}"), e.to_string()))?;
        let network = Ipv4Network::new(raw.network(), prefix)
            .map_err(|e| ScanError::invalid_range(&format!("{addr}/{prefix}"), e.to_string()))?;
        Ok(Self { network })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.network.contains(addr)
    }

    /// Whether this range shares at least one address with `other`.
    pub fn overlaps(&self, other: &Ipv4Network) -> bool {
        self.network.contains(other.network()) || other.contains(self.network())
    }

    /// Number of addresses in the block, network and broadcast included.
    pub fn len(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix()))
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every address of the block, in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Ipv4Addr> + Clone {
        let start: u32 = u32::from(self.network());
        let end: u32 = u32::from(self.broadcast());
        (start..=end).map(Ipv4Addr::from)
    }

    /// First usable host address; the network address itself for `/31` and `/32`.
    pub fn first_host(&self) -> Ipv4Addr {
        if self.prefix() >= 31 {
            self.network()
        } else {
            Ipv4Addr::from(u32::from(self.network()) + 1)
        }
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix())
    }
}

impl FromStr for NetworkRange {
    type Err = ScanError;

    /// Parses `a.b.c.d/len` or a single `a.b.c.d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(ScanError::invalid_range(s, "empty input"));
        }
        if input.contains(':') {
            return Err(ScanError::invalid_range(s, "only IPv4 ranges are supported"));
        }

        let (addr_part, prefix_part) = match input.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (input, None),
        };

        let addr: Ipv4Addr = addr_part
            .parse()
            .map_err(|_| ScanError::invalid_range(s, format!("'{addr_part}' is not an IPv4 address")))?;

        let prefix: u8 = match prefix_part {
            Some(p) => p
                .parse()
                .map_err(|_| ScanError::invalid_range(s, format!("'{p}' is not a prefix length")))?,
            None => 32,
        };

        if prefix > 32 {
            return Err(ScanError::invalid_range(s, format!("prefix {prefix} > 32")));
        }

        Self::new(addr, prefix)
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
