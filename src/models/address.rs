//! IPv4 addresses as plain 32-bit integers.
//!
//! Integer comparison on [`Address`] matches IP ordering, which is what the
//! boundary lists of the allocator rely on.

use crate::error::AddressError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Count of addresses.
pub type Offset = u32;

/// IPv4 address held as its big-endian integer value.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Default)]
pub struct Address(pub u32);

impl Address {
    /// Build an address from its four octets.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Address {
        Address(u32::from_be_bytes([a, b, c, d]))
    }

    /// The address as a std [`Ipv4Addr`].
    pub fn ip4(self) -> Ipv4Addr {
        Ipv4Addr::from(self.0)
    }

    /// Reverse the byte order, e.g. to convert to or from a little-endian
    /// kernel representation.
    pub fn reverse(self) -> Address {
        Address(self.0.swap_bytes())
    }
}

/// Advance `addr` by `i` addresses. Wraps at the top of the address space;
/// callers iterating near `255.255.255.255` check for that themselves.
pub fn add(addr: Address, i: Offset) -> Address {
    Address(addr.0.wrapping_add(i))
}

/// Number of addresses from `b` up to `a`.
///
/// # Panics
/// If `a < b`. An underflow here means a range was built backwards.
pub fn subtract(a: Address, b: Address) -> Offset {
    assert!(a >= b, "subtract({a}, {b}) would underflow");
    a.0 - b.0
}

pub fn min(a: Offset, b: Offset) -> Offset {
    a.min(b)
}

pub fn min_address(a: Address, b: Address) -> Address {
    a.min(b)
}

pub fn max_address(a: Address, b: Address) -> Address {
    a.max(b)
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address(u32::from(ip))
    }
}

impl From<Address> for Ipv4Addr {
    fn from(addr: Address) -> Self {
        addr.ip4()
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Address(value)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parse dotted-quad text. IPv4-mapped IPv6 text (`::ffff:a.b.c.d`) is
    /// accepted, any other IPv6 address is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ip) = Ipv4Addr::from_str(s) {
            return Ok(ip.into());
        }
        match Ipv6Addr::from_str(s) {
            Ok(ip6) => ip6
                .to_ipv4_mapped()
                .map(Address::from)
                .ok_or_else(|| AddressError::NonIpv4(s.to_string())),
            Err(_) => Err(AddressError::InvalidAddress(s.to_string())),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ip4())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(de::Error::custom)
    }
}
