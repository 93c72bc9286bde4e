//! Spinner during discovery, bar during the port scan.
//!
//! At most one indicator is active at a time. Log output goes through
//! [`suspend`] so lines land above it instead of through it.

use std::sync::Mutex;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use lansweep_common::observer::{ScanEvent, ScanObserver, TracingObserver};

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Runs `f` with the active indicator hidden.
pub fn suspend<F: FnOnce() -> R, R>(f: F) -> R {
    let active = ACTIVE.lock().ok().and_then(|guard| guard.clone());
    match active {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

fn install(pb: ProgressBar) {
    pb.enable_steady_tick(TICK_INTERVAL);
    if let Ok(mut guard) = ACTIVE.lock() {
        if let Some(previous) = guard.replace(pb) {
            previous.finish_and_clear();
        }
    }
}

fn with_active(f: impl FnOnce(&ProgressBar)) {
    if let Some(pb) = ACTIVE.lock().ok().and_then(|guard| guard.clone()) {
        f(&pb);
    }
}

pub fn clear() {
    let taken = ACTIVE.lock().ok().and_then(|mut guard| guard.take());
    if let Some(pb) = taken {
        pb.finish_and_clear();
    }
}

fn spinner(msg: String) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(msg);
    pb
}

fn bar(total: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.blue} [{bar:32.green/black}] {pos}/{len} hosts {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .tick_strings(TICKS)
    .progress_chars("█▓░");
    let pb = ProgressBar::new(total as u64);
    pb.set_style(style);
    pb
}

/// Drives the terminal indicators and logs every event.
///
/// Indicators are only drawn at quiet level 0; events are logged regardless.
pub struct TerminalObserver {
    quiet: u8,
}

impl TerminalObserver {
    pub fn new(quiet: u8) -> Self {
        Self { quiet }
    }

    fn draws_progress(&self) -> bool {
        self.quiet == 0
    }
}

impl ScanObserver for TerminalObserver {
    fn notify(&self, event: ScanEvent) {
        match &event {
            ScanEvent::DiscoveryStarted { .. } if self.draws_progress() => {
                install(spinner("Waiting for ARP replies...".to_string()));
            }
            ScanEvent::HostFound { found, .. } => with_active(|pb| {
                pb.set_message(format!(
                    "Identified {} hosts so far...",
                    found.to_string().green().bold()
                ))
            }),
            ScanEvent::DiscoveryFinished { .. } | ScanEvent::DiscoveryUnauthorized { .. } => {
                clear()
            }
            ScanEvent::PortScanStarted { hosts, .. } if self.draws_progress() => {
                install(bar(*hosts))
            }
            ScanEvent::HostScanned {
                completed, address, ..
            } => with_active(|pb| {
                pb.set_position(*completed as u64);
                pb.set_message(address.to_string());
            }),
            ScanEvent::PortScanFinished { .. } => clear(),
            _ => {}
        }

        TracingObserver.notify(event);
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
