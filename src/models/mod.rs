//! Value types for address arithmetic.
//!
//! - [`Range`] - one CIDR block over IPv4 or IPv6
//! - [`RangeList`] - occupancy set of blocks

mod range;
mod range_list;

// Re-export public types
pub use range::{addr_to_int, mask_for, Range, IPV4_BITS, IPV6_BITS};
pub use range_list::RangeList;
