//! One-shot scope level CIDR selection.
//!
//! Stateless, safe to call from many threads at once. The result is only as
//! good as the `existing_ranges` snapshot: two callers holding stale
//! snapshots of the same network can both pick the same block.

use super::scan::{check_mask, find_vacant};
use crate::error::{AllocateError, Result};
use crate::models::{Range, RangeList, IPV4_BITS};
use lazy_static::lazy_static;
use std::net::{IpAddr, Ipv4Addr};

/// Returned as is when there are no reserved ranges at all.
pub const DEFAULT_CIDR: &str = "10.250.4.0/22";

/// Blocks never handed out by [`allocate_cidr`]: cluster pods and services.
pub const RESERVED_RANGES: &[&str] = &["10.96.0.0/13", "10.104.0.0/13"];

/// Seed block base used when the caller has no existing ranges.
const DEFAULT_NODES_BASE: Ipv4Addr = Ipv4Addr::new(10, 250, 0, 0);

lazy_static! {
    static ref RESERVED: Vec<Range> = RESERVED_RANGES
        .iter()
        .map(|cidr| Range::parse(cidr).expect("Invalid reserved range?"))
        .collect();
}

/// Pick the first free `/mask_ones` block after `existing_ranges[0]`.
///
/// Every entry of `existing_ranges` and [`RESERVED_RANGES`] counts as
/// occupied. With no existing ranges the scan begins after
/// `10.250.0.0/<mask_ones>`.
pub fn allocate_cidr<S: AsRef<str>>(mask_ones: u8, existing_ranges: &[S]) -> Result<String> {
    allocate_cidr_with_reserved(mask_ones, existing_ranges, &RESERVED)
}

/// [`allocate_cidr`] against an explicit reserved list.
pub fn allocate_cidr_with_reserved<S: AsRef<str>>(
    mask_ones: u8,
    existing_ranges: &[S],
    reserved: &[Range],
) -> Result<String> {
    if reserved.is_empty() {
        return Ok(DEFAULT_CIDR.to_string());
    }

    let mut occupied = RangeList::new();
    for cidr in existing_ranges {
        occupied.add([Range::parse(cidr.as_ref())?]);
    }
    occupied.add(reserved.iter().cloned());

    let seed = match existing_ranges.first() {
        Some(first) => Range::parse(first.as_ref())?,
        None => {
            check_mask(mask_ones, IPV4_BITS)?;
            Range::from_addr(IpAddr::V4(DEFAULT_NODES_BASE), mask_ones)?
        }
    };
    check_mask(mask_ones, seed.bits())?;
    let start = seed
        .next_with_ones(mask_ones)
        .ok_or(AllocateError::NoVacantSlot)?;

    let found = find_vacant(&occupied, start, mask_ones, None)?;
    log::info!("selected {found} after {seed} for scope");
    Ok(found.to_string())
}
