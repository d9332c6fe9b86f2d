//! Error types for address arithmetic, the space allocator and configuration.
//!
//! Only recoverable failures live here. Exhaustion is reported as `None` and
//! broken internal invariants panic.

use crate::models::Address;
use thiserror::Error;

/// Failures parsing or manipulating addresses, ranges and CIDR blocks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("non-IPv4 address not supported: {0}")]
    NonIpv4(String),

    #[error("invalid CIDR format: {0}")]
    InvalidCidr(String),

    #[error("invalid prefix length in {0}")]
    InvalidPrefixLength(String),

    #[error("{0} is not aligned to its prefix length")]
    NotSubnet(String),

    #[error("invalid address range: {0}")]
    InvalidRange(String),

    #[error("CIDR is too small")]
    CidrTooSmall,
}

/// Precondition violations on single-address operations of a [`crate::space::Space`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceError {
    #[error("Address {0} is not free to claim")]
    NotFree(Address),

    #[error("Address {0} is not ours")]
    NotOwned(Address),

    #[error("Address {0} is already free")]
    AlreadyFree(Address),
}

/// Failures loading configuration for the diagnostic binary.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {source}")]
    Range {
        key: &'static str,
        #[source]
        source: AddressError,
    },

    #[error("invalid value for {key}: {value}")]
    Value { key: &'static str, value: String },
}
