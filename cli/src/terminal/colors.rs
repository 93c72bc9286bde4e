use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const MAC_ADDR: Color = Color::Cyan;
pub const OPEN_PORTS: Color = Color::Yellow;
pub const EMPTY: Color = Color::BrightBlack;
