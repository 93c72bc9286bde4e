use std::io;
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};

use lansweep_common::ScanError;

const READ_TIMEOUT: Duration = Duration::from_millis(50);

pub struct EthernetHandle {
    pub tx: Box<dyn DataLinkSender>,
    pub rx: Box<dyn DataLinkReceiver>,
}

/// Opens a layer 2 channel on `intf`.
pub fn open_channel(intf: &NetworkInterface) -> Result<EthernetHandle, ScanError> {
    open_eth_channel(intf, &get_config(), datalink::channel)
}

pub(crate) fn open_eth_channel<F>(
    intf: &NetworkInterface,
    cfg: &Config,
    channel_opener: F,
) -> Result<EthernetHandle, ScanError>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    match channel_opener(intf, *cfg) {
        Ok(Channel::Ethernet(tx, rx)) => Ok(EthernetHandle { tx, rx }),
        Ok(_) => Err(ScanError::Channel {
            interface: intf.name.clone(),
            source: io::Error::other("non-ethernet channel"),
        }),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(
            ScanError::PermissionDenied(format!("opening on {}: {e}", intf.name)),
        ),
        Err(e) => Err(ScanError::Channel {
            interface: intf.name.clone(),
            source: e,
        }),
    }
}

fn get_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
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

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::datalink::dummy;

    #[test]
    fn open_eth_channel_should_succeed_on_ethernet_channel() {
        let dummy_intf: NetworkInterface = dummy::dummy_interface(0);
        let opener = |i: &NetworkInterface, _cfg: Config| -> io::Result<Channel> {
            dummy::channel(i, dummy::Config::default())
        };
        let result = open_eth_channel(&dummy_intf, &Config::default(), opener);
        assert!(result.is_ok());
    }

    #[test]
    fn open_eth_channel_maps_permission_denied() {
        let dummy_intf: NetworkInterface = dummy::dummy_interface(0);
        let opener = |_: &NetworkInterface, _: Config| -> io::Result<Channel> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "Operation not permitted"))
        };
        let err = open_eth_channel(&dummy_intf, &Config::default(), opener)
            .err()
            .expect("expected an error");
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("opening on eth0"));
    }

    #[test]
    fn open_eth_channel_keeps_other_io_errors() {
        let dummy_intf: NetworkInterface = dummy::dummy_interface(0);
        let opener = |_: &NetworkInterface, _: Config| -> io::Result<Channel> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such device"))
        };
        let err = open_eth_channel(&dummy_intf, &Config::default(), opener)
            .err()
            .expect("expected an error");
        match err {
            ScanError::Channel { interface, source } => {
                assert_eq!(interface, "eth0");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
