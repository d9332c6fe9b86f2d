//! Address-space bookkeeping for one peer of an IPAM facility.
//!
//! Each peer holds disjoint parts of a shared IPv4 pool. This crate tracks,
//! purely locally, which of those addresses are allocated and which are free,
//! hands out and reclaims single addresses, and picks the part of the free
//! space to donate when another peer needs room.
//!
//! - [`models`] - address, range and CIDR arithmetic
//! - [`space`] - the per-peer allocator
//! - [`monitor`] - reacting to changes in the ranges a peer owns
//! - [`output`] - diagnostic report and JSON snapshot

pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod output;
pub mod space;

pub use error::{AddressError, ConfigError, SpaceError};
pub use models::{Address, Cidr, Offset, Range};
pub use space::{OwnedCidrs, Space};
