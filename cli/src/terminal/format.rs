use crate::terminal::colors;
use colored::*;
use lansweep_common::network::host::{HardwareAddress, Host};

const NOT_AVAILABLE: &str = "N/A";

/// One results-table row, colored and ready to pad.
pub struct HostCells {
    pub ip: ColoredString,
    pub mac: ColoredString,
    pub ports: ColoredString,
}

impl From<&Host> for HostCells {
    fn from(host: &Host) -> Self {
        Self {
            ip: host.address.to_string().color(colors::PRIMARY),
            mac: mac_cell(&host.hardware_address),
            ports: ports_cell(host),
        }
    }
}

pub fn mac_cell(hardware_address: &HardwareAddress) -> ColoredString {
    match hardware_address {
        HardwareAddress::Known(mac) => mac.to_string().color(colors::MAC_ADDR),
        HardwareAddress::Unknown => hardware_address.to_string().color(colors::EMPTY),
    }
}

/// Open ports, or `N/A` when none were found or the host was not scanned.
pub fn ports_cell(host: &Host) -> ColoredString {
    let ports = host.format_open_ports();
    if ports.is_empty() {
        NOT_AVAILABLE.color(colors::EMPTY)
    } else {
        ports.color(colors::OPEN_PORTS).bold()
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
