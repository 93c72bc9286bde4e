//! Host discovery abstraction.
//!
//! The coordinator depends on [`HostDiscoverer`] only; the [`arp`] module holds
//! the link-layer implementation used on a real network.

use std::time::Duration;

use async_trait::async_trait;
use lansweep_common::ScanError;
use lansweep_common::network::host::Host;
use lansweep_common::network::range::NetworkRange;
use lansweep_common::observer::ScanObserver;

pub mod arp;

pub use arp::ArpDiscoverer;

/// Finds every host answering within `range`.
#[async_trait]
pub trait HostDiscoverer: Send + Sync {
    /// Returns hosts in response order with unique addresses and unset ports.
    ///
    /// Zero hosts is a valid result. Missing privileges fail with
    /// [`ScanError::PermissionDenied`] and never yield partial results.
    async fn discover(
        &self,
        range: &NetworkRange,
        timeout: Duration,
        observer: &dyn ScanObserver,
    ) -> Result<Vec<Host>, ScanError>;
}
