//! Network addresses, socket addresses and prefixes.

use super::SettingValue;
use crate::error::ValueError;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

macro_rules! impl_from_str {
    ($($t:ty => $expected:literal),* $(,)?) => {$(
        impl SettingValue for $t {
            fn parse_setting(value: &str) -> Result<Self, ValueError> {
                value
                    .parse::<$t>()
                    .map_err(|err| ValueError::malformed(value, $expected, err))
            }
        }
    )*};
}

impl_from_str!(
    IpAddr => "IP address",
    Ipv4Addr => "IPv4 address",
    Ipv6Addr => "IPv6 address",
    SocketAddr => "address and port",
    IpNet => "network prefix",
    Ipv4Net => "IPv4 network prefix",
    Ipv6Net => "IPv6 network prefix",
);
