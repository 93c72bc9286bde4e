use std::net::Ipv4Addr;

use anyhow::{Context, ensure};
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherType, EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::util::MacAddr;

pub const ETH_HDR_LEN: usize = 14;
pub const ARP_LEN: usize = 28;
pub const MIN_ETH_FRAME_NO_FCS: usize = 60;

/// Sender of an ARP reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub sender_addr: Ipv4Addr,
    pub sender_mac: MacAddr,
}

/// Builds a broadcast ARP request asking who holds `dst_addr`.
pub fn create_request(
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> anyhow::Result<Vec<u8>> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    make_header(&mut buffer, src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;

    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .context("failed to create mutable ARP packet")?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(6);
    arp_packet.set_proto_addr_len(4);
    arp_packet.set_operation(ArpOperations::Request);
    arp_packet.set_sender_hw_addr(src_mac);
    arp_packet.set_target_hw_addr(MacAddr::zero());
    arp_packet.set_sender_proto_addr(src_addr);
    arp_packet.set_target_proto_addr(dst_addr);

    Ok(Vec::from(buffer))
}

/// Extracts the answering host from a raw Ethernet frame carrying an ARP reply.
pub fn parse_reply(frame: &[u8]) -> anyhow::Result<ArpReply> {
    let eth_frame = EthernetPacket::new(frame).context("truncated Ethernet frame")?;
    ensure!(
        eth_frame.get_ethertype() == EtherTypes::Arp,
        "not an ARP frame ({:?})",
        eth_frame.get_ethertype()
    );

    let arp_packet = ArpPacket::new(eth_frame.payload()).context(format!(
        "truncated or invalid ARP packet (payload len {})",
        eth_frame.payload().len()
    ))?;
    ensure!(
        arp_packet.get_operation() == ArpOperations::Reply,
        "ARP packet is not a reply"
    );
    ensure!(
        arp_packet.get_protocol_type() == EtherTypes::Ipv4,
        "ARP reply does not carry IPv4 addresses"
    );

    Ok(ArpReply {
        sender_addr: arp_packet.get_sender_proto_addr(),
        sender_mac: arp_packet.get_sender_hw_addr(),
    })
}

fn make_header(
    buffer: &mut [u8],
    src_mac: MacAddr,
    dst_mac: MacAddr,
    et: EtherType,
) -> anyhow::Result<()> {
    let mut eth = MutableEthernetPacket::new(&mut buffer[..])
        .context("failed to create mutable Ethernet packet")?;

    eth.set_source(src_mac);
    eth.set_destination(dst_mac);
    eth.set_ethertype(et);

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
