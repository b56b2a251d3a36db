//! Local network helpers

use std::net::{IpAddr, Ipv4Addr};

/// First non-loopback IPv4 address of this machine
pub fn lan_ipv4() -> Option<Ipv4Addr> {
    let interfaces = if_addrs::get_if_addrs().ok()?;
    interfaces
        .into_iter()
        .filter(|iface| !iface.is_loopback())
        .find_map(|iface| match iface.ip() {
            IpAddr::V4(ip) if !ip.is_link_local() => Some(ip),
            _ => None,
        })
}

/// The /24 this machine sits on, used as a sweep hint by the CLI
pub fn local_subnet() -> Option<String> {
    lan_ipv4().map(crate::discovery::sweep::subnet_of)
}
