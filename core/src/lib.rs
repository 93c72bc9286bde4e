//! Engine of the scanner: host discovery, port probing and the coordinator
//! that sequences them.

pub mod coordinator;
pub mod discovery;
pub mod export;
pub mod network;
pub mod scanner;
pub mod system;

pub use coordinator::{DiscoveryStatus, ScanCoordinator, ScanReport, ScanRequest};
