mod external;

pub use external::{HttpResolver, DEFAULT_IPV4_URL, DEFAULT_IPV6_URL};

use std::fmt;
use std::net::IpAddr;

use async_trait::async_trait;

use crate::error::{FlagError, LookupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    pub fn matches(self, ip: &IpAddr) -> bool {
        match self {
            IpFamily::V4 => ip.is_ipv4(),
            IpFamily::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => write!(f, "IPv4"),
            IpFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Which address families a run should touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Families {
    pub ipv4: bool,
    pub ipv6: bool,
}

impl Families {
    pub const BOTH: Families = Families { ipv4: true, ipv6: true };

    /// Turns the `-4`/`-6` restriction flags into a selection. Neither flag
    /// means both families; both flags together is a user error.
    pub fn from_flags(ipv4_only: bool, ipv6_only: bool) -> Result<Self, FlagError> {
        match (ipv4_only, ipv6_only) {
            (true, true) => Err(FlagError::MutuallyExclusive),
            (true, false) => Ok(Families { ipv4: true, ipv6: false }),
            (false, true) => Ok(Families { ipv4: false, ipv6: true }),
            (false, false) => Ok(Self::BOTH),
        }
    }

    /// Requested families, IPv4 first.
    pub fn iter(self) -> impl Iterator<Item = IpFamily> {
        [(self.ipv4, IpFamily::V4), (self.ipv6, IpFamily::V6)]
            .into_iter()
            .filter_map(|(wanted, family)| wanted.then_some(family))
    }
}

#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Look up the current public address for `family`.
    ///
    /// `Ok(None)` means the host has no connectivity for that family, which
    /// is not an error.
    async fn resolve(&self, family: IpFamily) -> Result<Option<IpAddr>, LookupError>;
}
