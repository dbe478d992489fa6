//! CIDR allocation.
//!
//! - [`AddressSpace`] - stateful allocator for per resource subnets and addresses
//! - [`SharedAddressSpace`] - the same allocator behind a lock
//! - [`allocate_cidr`] - stateless scope level selection

mod address_space;
mod allocate_cidr;
mod scan;
mod shared;

// Re-export public types and functions
pub use address_space::{AddressSpace, DEFAULT_BASE};
pub use allocate_cidr::{allocate_cidr, allocate_cidr_with_reserved, DEFAULT_CIDR, RESERVED_RANGES};
pub use shared::SharedAddressSpace;
