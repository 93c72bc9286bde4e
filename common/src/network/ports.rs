use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ScanError;

/// Ports probed when the caller does not name any.
pub const DEFAULT_PORTS: [u16; 10] = [21, 22, 23, 25, 80, 110, 139, 443, 445, 3389];

/// A non-empty, duplicate-free list of TCP ports in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortList {
    ports: Vec<u16>,
}

impl PortList {
    pub fn new(ports: impl IntoIterator<Item = u16>) -> Result<Self, ScanError> {
        let mut seen: HashSet<u16> = HashSet::new();
        let mut unique: Vec<u16> = Vec::new();
        for port in ports {
            if port == 0 {
                return Err(ScanError::invalid_ports("0", "port 0 is not scannable"));
            }
            if seen.insert(port) {
                unique.push(port);
            }
        }
        if unique.is_empty() {
            return Err(ScanError::invalid_ports("", "no ports given"));
        }
        Ok(Self { ports: unique })
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.ports
    }

    pub fn contains(&self, port: u16) -> bool {
        self.ports.contains(&port)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl Default for PortList {
    fn default() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
        }
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.ports.iter().map(u16::to_string).collect();
        write!(f, "{}", joined.join(","))
    }
}

impl FromStr for PortList {
    type Err = ScanError;

    /// Parses `22,80,443`; inclusive ranges such as `8000-8010` are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ports: Vec<u16> = Vec::new();

        for entry in s.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(ScanError::invalid_ports(s, "empty entry"));
            }

            match entry.split_once('-') {
                Some((start, end)) => {
                    let start = parse_port(s, start.trim())?;
                    let end = parse_port(s, end.trim())?;
                    if start > end {
                        return Err(ScanError::invalid_ports(s, format!("reversed range {entry}")));
                    }
                    ports.extend(start..=end);
                }
                None => ports.push(parse_port(s, entry)?),
            }
        }

        Self::new(ports).map_err(|_| ScanError::invalid_ports(s, "no ports given"))
    }
}

fn parse_port(input: &str, entry: &str) -> Result<u16, ScanError> {
    let port: u16 = entry
        .parse()
        .map_err(|_| ScanError::invalid_ports(input, format!("'{entry}' is not a port number")))?;
    if port == 0 {
        return Err(ScanError::invalid_ports(input, "port 0 is not scannable"));
    }
    Ok(port)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
