use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

use crate::error::ScanError;

/// Rendering of a hardware address that could not be resolved.
pub const UNKNOWN_HARDWARE_ADDRESS: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareAddress {
    Known(MacAddr),
    /// Hosts that did not answer a resolution request, such as the local machine.
    Unknown,
}

impl HardwareAddress {
    pub fn mac(&self) -> Option<MacAddr> {
        match self {
            Self::Known(mac) => Some(*mac),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(mac) => write!(f, "{mac}"),
            Self::Unknown => f.write_str(UNKNOWN_HARDWARE_ADDRESS),
        }
    }
}

impl From<MacAddr> for HardwareAddress {
    fn from(mac: MacAddr) -> Self {
        Self::Known(mac)
    }
}

/// One endpoint found or injected during a scan run.
///
/// `open_ports` stays `None` until a port scan touches the host, so a host that
/// was never scanned can be told apart from one with nothing open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub address: Ipv4Addr,
    pub hardware_address: HardwareAddress,
    pub open_ports: Option<BTreeSet<u16>>,
}

impl Host {
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            hardware_address: HardwareAddress::Unknown,
            open_ports: None,
        }
    }

    pub fn with_mac(mut self, mac: MacAddr) -> Self {
        self.hardware_address = HardwareAddress::Known(mac);
        self
    }

    pub fn is_scanned(&self) -> bool {
        self.open_ports.is_some()
    }

    /// Comma-joined open ports in ascending order; empty when none or unscanned.
    pub fn format_open_ports(&self) -> String {
        self.open_ports
            .as_ref()
            .map(format_ports)
            .unwrap_or_default()
    }
}

pub fn format_ports(ports: &BTreeSet<u16>) -> String {
    ports
        .iter()
        .map(u16::to_string)
        .collect::<Vec<String>>()
        .join(",")
}

/// Inverse of [`format_ports`]. An empty string yields an empty set.
pub fn parse_open_ports(s: &str) -> Result<BTreeSet<u16>, ScanError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(BTreeSet::new());
    }

    trimmed
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            match entry.parse::<u16>() {
                Ok(port) if port != 0 => Ok(port),
                _ => Err(ScanError::invalid_ports(s, format!("'{entry}' is not a port number"))),
            }
        })
        .collect()
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
    fn new_host_is_unscanned_and_unknown() {
        let host = Host::new(Ipv4Addr::new(192, 168, 1, 5));
        assert_eq!(host.hardware_address, HardwareAddress::Unknown);
        assert!(!host.is_scanned());
        assert_eq!(host.hardware_address.to_string(), "unknown");
        assert_eq!(host.format_open_ports(), "");
    }

    #[test]
    fn with_mac_sets_hardware_address() {
        let mac = MacAddr::new(0xaa, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa);
        let host = Host::new(Ipv4Addr::new(192, 168, 1, 10)).with_mac(mac);
        assert_eq!(host.hardware_address.mac(), Some(mac));
        assert_eq!(host.hardware_address.to_string(), "aa:aa:aa:aa:aa:aa");
    }

    #[test]
    fn scanned_with_nothing_open_differs_from_unscanned() {
        let mut host = Host::new(Ipv4Addr::new(10, 0, 0, 1));
        host.open_ports = Some(BTreeSet::new());
        assert!(host.is_scanned());
        assert_ne!(host, Host::new(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn open_ports_serialize_and_parse_back() {
        let ports = BTreeSet::from([443, 22, 80]);
        let serialized = format_ports(&ports);
        assert_eq!(serialized, "22,80,443");
        assert_eq!(parse_open_ports(&serialized).unwrap(), ports);
        assert_eq!(parse_open_ports("443, 80,22").unwrap(), ports);
    }

    #[test]
    fn parse_open_ports_empty_and_invalid() {
        assert!(parse_open_ports("").unwrap().is_empty());
        assert!(parse_open_ports("22,x").is_err());
        assert!(parse_open_ports("22,0").is_err());
    }
}
