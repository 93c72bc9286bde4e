use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{error, info, warn};

use crate::commands::CommandLine;
use crate::mprint;
use crate::terminal::format::HostCells;
use crate::terminal::progress::{self, TerminalObserver};
use crate::terminal::{colors, print};
use lansweep_common::config::ScanConfig;
use lansweep_common::network::host::Host;
use lansweep_common::network::ports::PortList;
use lansweep_common::network::range::NetworkRange;
use lansweep_core::export;
use lansweep_core::{ScanCoordinator, ScanReport, ScanRequest};

pub async fn scan(cli: &CommandLine) -> anyhow::Result<()> {
    let range: NetworkRange = match cli.target.parse() {
        Ok(range) => range,
        Err(e) => {
            error!("{e}");
            error!("Use CIDR notation, e.g. 192.168.1.0/24");
            return Ok(());
        }
    };

    let mut request = ScanRequest::new(range).include_self(!cli.no_self);
    if cli.scan_ports {
        match cli.ports.parse::<PortList>() {
            Ok(ports) => request = request.with_ports(ports),
            Err(e) => {
                error!("{e}");
                error!("Ports are comma separated numbers, e.g. 22,80,443");
                return Ok(());
            }
        }
    }

    let config = ScanConfig {
        discovery_timeout: Duration::from_secs(cli.discovery_timeout),
        connect_timeout: Duration::from_millis(cli.connect_timeout),
        max_concurrency: cli.concurrency,
    };
    config.validate().context("invalid tuning flags")?;

    print_parameters(&request, &config, cli.quiet);

    let start_time = Instant::now();
    let coordinator = ScanCoordinator::new(&config);
    let result = coordinator.run(&request, &TerminalObserver::new(cli.quiet)).await;
    progress::clear();
    let report: ScanReport = result.with_context(|| format!("scan of {range} failed"))?;

    if report.is_unauthorized() {
        warn!("ARP discovery needs root privileges; run with sudo to find other hosts");
    }

    if report.hosts.is_empty() {
        no_hosts_found(&range, cli.quiet);
        return Ok(());
    }

    print_results(&report.hosts, cli.quiet);
    print_summary(&report.hosts, start_time.elapsed(), cli.quiet);

    if let Some(path) = &cli.output {
        match export::write_csv(&report.hosts, path) {
            Ok(()) => info!("Results saved to {}", path.display()),
            Err(e) => error!("{e}"),
        }
    }

    Ok(())
}

fn print_parameters(request: &ScanRequest, config: &ScanConfig, q_level: u8) {
    if q_level > 0 {
        return;
    }

    print::header("scan parameters", q_level);
    print::param("Target", request.range);
    let ports = if request.scan_ports {
        request.ports.to_string().normal()
    } else {
        "discovery only".color(colors::EMPTY)
    };
    print::param("Ports", ports);
    print::param("Discovery", format!("{}s", config.discovery_timeout.as_secs_f64()));
    if request.scan_ports {
        print::param(
            "Connect",
            format!(
                "{}ms x {} parallel",
                config.connect_timeout.as_millis(),
                config.max_concurrency
            ),
        );
    }
}

fn no_hosts_found(range: &NetworkRange, q_level: u8) {
    print::header("zero hosts detected", q_level);
    warn!("No active hosts found in {range}");
}

fn print_results(hosts: &[Host], q_level: u8) {
    if q_level > 0 {
        mprint!();
    }
    print::header("scan results", q_level);

    if q_level >= 2 {
        return;
    }
    print::table_header();
    for host in hosts {
        print::table_row(&HostCells::from(host));
    }
}

fn print_summary(hosts: &[Host], total_time: Duration, q_level: u8) {
    let open_ports: usize = hosts
        .iter()
        .filter_map(|host| host.open_ports.as_ref())
        .map(|ports| ports.len())
        .sum();

    let active_hosts: ColoredString = format!("{} active hosts", hosts.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let mut line = format!("Scan Complete: {active_hosts} identified in {total_time}");
    if hosts.iter().any(Host::is_scanned) {
        line.push_str(&format!(", {} open ports", open_ports.to_string().bold().yellow()));
    }
    let output: ColoredString = line.color(colors::TEXT_DEFAULT);

    match q_level {
        0 => {
            print::separator();
            mprint!(&output.to_string());
        }
        _ => {
            mprint!();
            info!("{}", output);
        }
    }
}
