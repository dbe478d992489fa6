//! CIDR address space allocation.
//!
//! Carves non-overlapping blocks out of a shared network for IPv4 and IPv6:
//! - [`models`] - [`models::Range`] arithmetic and the [`models::RangeList`] occupancy set
//! - [`allocate`] - [`allocate::AddressSpace`] and the stateless [`allocate::allocate_cidr`]
//!
//! The remaining modules back the `cidr-allocate` binary.

pub mod allocate;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;

pub use allocate::{allocate_cidr, AddressSpace, SharedAddressSpace};
pub use error::{AllocateError, Result};
pub use models::{Range, RangeList};
