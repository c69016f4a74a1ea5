//! Source address allow-list.

use std::net::{AddrParseError, IpAddr};

/// Addresses the gateway sends notifications from.
pub const DEFAULT_GATEWAY_IPS: [&str; 2] = ["62.84.126.140", "51.250.106.150"];

/// Set of addresses allowed to deliver callbacks.
///
/// Comparison is by parsed address, so `::ffff:62.84.126.140` matches
/// `62.84.126.140`. Anything that does not parse as an address never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpAllowList {
    addrs: Vec<IpAddr>,
}

impl IpAllowList {
    pub fn new(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            addrs: addrs.into_iter().map(normalize).collect(),
        }
    }

    /// Parses textual addresses.
    pub fn parse<S: AsRef<str>>(addrs: &[S]) -> Result<Self, AddrParseError> {
        let parsed = addrs
            .iter()
            .map(|a| a.as_ref().trim().parse::<IpAddr>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(parsed))
    }

    /// The gateway's published notification addresses.
    pub fn gateway_defaults() -> Self {
        Self::new(
            DEFAULT_GATEWAY_IPS
                .iter()
                .filter_map(|a| a.parse::<IpAddr>().ok()),
        )
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        self.addrs.contains(&normalize(addr))
    }

    /// Membership test for an address as observed by the transport.
    pub fn contains_str(&self, addr: &str) -> bool {
        addr.trim()
            .parse::<IpAddr>()
            .map(|ip| self.contains(ip))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    pub fn addrs(&self) -> &[IpAddr] {
        &self.addrs
    }
}

fn normalize(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(addr),
        v4 => v4,
    }
}
