pub mod arp;
pub mod datalink;
pub mod tcp;
