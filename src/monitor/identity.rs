// SPDX-License-Identifier: MPL-2.0

//! Hostname and private address lookup

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use sysinfo::{Networks, System};

/// Who this host is on the local network.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    pub hostname: Option<String>,
    /// Private (RFC 1918) IPv4 addresses across all interfaces.
    pub addresses: Vec<Ipv4Addr>,
}

/// Resolve the hostname and collect private interface addresses.
pub fn host_identity() -> HostIdentity {
    let networks = Networks::new_with_refreshed_list();
    let mut addresses = Vec::new();
    for (_interface_name, network) in &networks {
        for ip_network in network.ip_networks() {
            if let Some(v4) = private_v4(&ip_network.addr) {
                addresses.push(v4);
            }
        }
    }
    addresses.sort_unstable();
    addresses.dedup();

    HostIdentity {
        hostname: System::host_name(),
        addresses,
    }
}

fn private_v4(addr: &IpAddr) -> Option<Ipv4Addr> {
    match addr {
        IpAddr::V4(v4) if v4.is_private() => Some(*v4),
        _ => None,
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host: {}", self.hostname.as_deref().unwrap_or("unknown"))?;
        if self.addresses.is_empty() {
            write!(f, ", no private addresses")
        } else {
            write!(f, " [")?;
            for (i, addr) in self.addresses.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{addr}")?;
            }
            write!(f, "]")
        }
    }
}
