//! Value types for IPv4 address arithmetic.
//!
//! This module contains the data structures the allocator is built on:
//! - [`Address`] - IPv4 address as a 32-bit integer, plus [`Offset`] arithmetic
//! - [`Range`] - half-open address range with CIDR decomposition
//! - [`Cidr`] - address block in `a.b.c.d/n` notation

mod address;
mod cidr;
mod range;

// Re-export public types
pub use address::{add, max_address, min, min_address, subtract, Address, Offset};
pub use cidr::{netmask, Cidr, MAX_LENGTH};
pub use range::Range;
