//! CIDR blocks and the bit-level helpers behind them.

use super::address::{add, Address, Offset};
use super::range::Range;
use crate::error::AddressError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum prefix length of an IPv4 block (a single address).
pub const MAX_LENGTH: u8 = 32;

/// Convert a prefix length to a netmask.
///
/// # Examples
/// ```
/// use weave_space::models::netmask;
/// assert_eq!(netmask(24), 0xFFFFFF00);
/// ```
///
/// # Panics
/// If `len` is larger than [`MAX_LENGTH`].
pub fn netmask(len: u8) -> u32 {
    assert!(len <= MAX_LENGTH, "prefix length {len} is too long");
    let right_len = MAX_LENGTH - len;
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// Address block `addr/prefix_len`, covering `[addr, addr + 2^(32-prefix_len))`.
///
/// `addr` is kept as given; [`Cidr::is_subnet`] tells whether it is aligned.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Cidr {
    /// First address of the block.
    pub addr: Address,
    /// Prefix length (0-32).
    pub prefix_len: u8,
}

impl Cidr {
    pub fn new(addr: Address, prefix_len: u8) -> Result<Cidr, AddressError> {
        if prefix_len > MAX_LENGTH {
            return Err(AddressError::InvalidPrefixLength(format!("{addr}/{prefix_len}")));
        }
        Ok(Cidr { addr, prefix_len })
    }

    /// A block of the same size as `subnet`, located at `addr`.
    pub fn make(subnet: Cidr, addr: Address) -> Cidr {
        Cidr {
            addr,
            prefix_len: subnet.prefix_len,
        }
    }

    /// Parse `a.b.c.d/n` and additionally require the address to be aligned.
    pub fn parse_subnet(s: &str) -> Result<Cidr, AddressError> {
        let cidr = Cidr::from_str(s)?;
        if !cidr.is_subnet() {
            return Err(AddressError::NotSubnet(cidr.to_string()));
        }
        Ok(cidr)
    }

    /// Number of addresses in the block. A `/0` block wraps to zero, the same
    /// way its range end wraps.
    pub fn size(&self) -> Offset {
        1u32.checked_shl((MAX_LENGTH - self.prefix_len) as u32).unwrap_or(0)
    }

    /// True when `addr` has no bits set below the prefix.
    pub fn is_subnet(&self) -> bool {
        self.addr.0 & !netmask(self.prefix_len) == 0
    }

    pub fn range(&self) -> Range {
        Range::new(self.addr, self.size())
    }

    /// The block without its first and last address (RFC 1122 exclusions).
    pub fn host_range(&self) -> Range {
        Range::new(add(self.addr, 1), self.size().saturating_sub(2))
    }

    /// Split into two equal children with prefix length + 1.
    ///
    /// Fails with [`AddressError::CidrTooSmall`] on a `/32`.
    pub fn halve(&self) -> Result<(Cidr, Cidr), AddressError> {
        if self.prefix_len == MAX_LENGTH {
            return Err(AddressError::CidrTooSmall);
        }
        let prefix_len = self.prefix_len + 1;
        let half = Cidr {
            addr: self.addr,
            prefix_len,
        };
        Ok((half, Cidr::make(half, add(self.addr, half.size()))))
    }
}

impl FromStr for Cidr {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr, prefix_len) = s
            .split_once('/')
            .ok_or_else(|| AddressError::InvalidCidr(s.to_string()))?;
        let addr = match Address::from_str(addr) {
            Ok(addr) => addr,
            Err(AddressError::NonIpv4(_)) => return Err(AddressError::NonIpv4(s.to_string())),
            Err(_) => return Err(AddressError::InvalidCidr(s.to_string())),
        };
        let prefix_len: u8 = prefix_len
            .parse()
            .map_err(|_| AddressError::InvalidPrefixLength(s.to_string()))?;
        Cidr::new(addr, prefix_len)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::from_str(&s).map_err(de::Error::custom)
    }
}
