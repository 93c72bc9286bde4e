//! Shared building blocks for **lansweep**.
//!
//! Holds the data model handed between the engine and its collaborators
//! ([`network::host::Host`]), the validated inputs ([`network::range::NetworkRange`],
//! [`network::ports::PortList`]), the error taxonomy and the notification channel
//! the engine reports through.

pub mod config;
pub mod error;
pub mod network;
pub mod observer;
pub mod utils;

pub use error::ScanError;
