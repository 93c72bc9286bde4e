pub mod scan;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use lansweep_common::network::ports::DEFAULT_PORTS;

fn default_ports() -> String {
    DEFAULT_PORTS
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Parser, Debug)]
#[command(name = "lansweep")]
#[command(version, about = "Discover hosts on a local network and probe their TCP ports.")]
#[command(after_help = "Example: sudo lansweep -t 192.168.1.0/24 --scan-ports --ports 22,80,443")]
pub struct CommandLine {
    /// Network to sweep in CIDR notation (e.g. 192.168.1.0/24)
    #[arg(short, long)]
    pub target: String,

    /// Write the results to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Probe TCP ports on every discovered host
    #[arg(long)]
    pub scan_ports: bool,

    /// Ports to probe, comma separated; ranges like 8000-8010 are accepted
    #[arg(long, default_value_t = default_ports())]
    pub ports: String,

    /// Seconds to wait for ARP replies
    #[arg(long, default_value_t = 3, value_name = "SECS")]
    pub discovery_timeout: u64,

    /// Milliseconds allowed for every single connection attempt
    #[arg(long, default_value_t = 500, value_name = "MS")]
    pub connect_timeout: u64,

    /// Maximum number of simultaneous connection attempts
    #[arg(long, default_value_t = 256, value_name = "N")]
    pub concurrency: usize,

    /// Do not add this machine to the port scan
    #[arg(long)]
    pub no_self: bool,

    /// Skip the banner
    #[arg(long)]
    pub no_banner: bool,

    /// Less decoration; repeat for results only
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More log output; repeat for trace level
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
