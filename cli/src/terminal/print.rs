//! Raw terminal output: the banner, section rules, parameter lines and the
//! results table. Everything is emitted on [`PRINT_TARGET`] so the logging
//! layer writes it verbatim above any active progress indicator.

use std::fmt::Display;

use crate::terminal::colors;
use crate::terminal::format::HostCells;
use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "lansweep::print";

const PARAM_WIDTH: usize = 10;
const IP_COLUMN: usize = 16;
const MAC_COLUMN: usize = 17;
const GAP: &str = "  ";

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

const BANNER: &str = r#"
      __    ___    _  __ ____ _      __ ____ ____ ___
     / /   / _ |  / |/ // __/| | /| / // __// __// _ \
    / /__ / __ | /    /_\ \  | |/ |/ // _/ / _/ / ___/
   /____//_/ |_|/_/|_//___/  |__/|__//___//___//_/
"#;

pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }
    let title = format!(" LANSWEEP v{} ", env!("CARGO_PKG_VERSION"));
    print(&rule("═", &title, Color::BrightGreen));
    print(&BANNER.cyan().to_string());
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    print(&rule("─", &format!(" {} ", msg.to_uppercase()), colors::PRIMARY));
}

pub fn separator() {
    print(&rule("═", "", colors::PRIMARY));
}

/// `fill` across [`TOTAL_WIDTH`] with `label` centered in it.
fn rule(fill: &str, label: &str, label_color: Color) -> String {
    let free = TOTAL_WIDTH.saturating_sub(label.width());
    let left = free / 2;
    format!(
        "{}{}{}",
        fill.repeat(left).color(colors::SEPARATOR),
        label.color(label_color).bold(),
        fill.repeat(free - left).color(colors::SEPARATOR)
    )
}

pub fn param(key: &str, value: impl Display) {
    let key = format!("{key:<PARAM_WIDTH$}");
    print(&format!("  {} {}", key.color(colors::PRIMARY), value));
}

pub fn table_header() {
    let heading = format!("{:<IP_COLUMN$}{GAP}{:<MAC_COLUMN$}{GAP}OPEN PORTS", "IP", "MAC");
    print(&heading.color(colors::ACCENT).bold().to_string());
    print(&"─".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

pub fn table_row(cells: &HostCells) {
    print(&table_line(cells));
}

fn table_line(cells: &HostCells) -> String {
    format!(
        "{}{GAP}{}{GAP}{}",
        pad(&cells.ip, IP_COLUMN),
        pad(&cells.mac, MAC_COLUMN),
        cells.ports
    )
}

/// Left-aligns a colored cell. Escape codes do not count toward `width`.
fn pad(cell: &ColoredString, width: usize) -> String {
    let fill = width.saturating_sub(cell.input.width());
    format!("{cell}{}", " ".repeat(fill))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
