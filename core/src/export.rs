//! CSV export of scan results.
//!
//! One row per host with the columns `ip,mac,open_ports`. Open ports are
//! written comma-joined in ascending order and are empty for unscanned hosts.

use std::io;
use std::path::Path;

use csv::Writer;
use lansweep_common::ScanError;
use lansweep_common::network::host::Host;

const HEADER: [&str; 3] = ["ip", "mac", "open_ports"];

pub fn write_rows<W: io::Write>(writer: &mut Writer<W>, hosts: &[Host]) -> csv::Result<()> {
    writer.write_record(HEADER)?;
    for host in hosts {
        writer.write_record([
            host.address.to_string(),
            host.hardware_address.to_string(),
            host.format_open_ports(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(hosts: &[Host]) -> anyhow::Result<String> {
    let mut writer = Writer::from_writer(vec![]);
    write_rows(&mut writer, hosts)?;
    let csv_data = String::from_utf8(writer.into_inner()?)?;
    Ok(csv_data)
}

/// Writes `hosts` to `path`, replacing any existing file.
pub fn write_csv(hosts: &[Host], path: &Path) -> Result<(), ScanError> {
    let export_error = |source: csv::Error| ScanError::Export {
        path: path.to_path_buf(),
        source: Box::new(source),
    };

    let mut writer = Writer::from_path(path).map_err(export_error)?;
    write_rows(&mut writer, hosts).map_err(export_error)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
