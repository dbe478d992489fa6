//! Stateful allocator carving blocks out of one address space.
//!
//! An [`AddressSpace`] keeps no state beyond its occupied set. Callers
//! rebuild it from the blocks currently claimed by sibling resources and
//! ask for the next free block of a given size.

use super::scan::{check_mask, find_vacant};
use crate::error::{AllocateError, Result};
use crate::models::{Range, RangeList, IPV4_BITS};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

/// Base address scanned from when no parent block is configured.
pub const DEFAULT_BASE: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 0);

/// Occupied blocks plus an optional parent block bounding the scan.
///
/// Not synchronized, see [`super::SharedAddressSpace`] for a handle that
/// can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    parent: Option<Range>,
    occupied: RangeList,
}

impl AddressSpace {
    /// Create an address space, optionally bounded by `parent_cidr`.
    pub fn new(parent_cidr: Option<&str>) -> Result<AddressSpace> {
        let parent = parent_cidr.map(Range::parse).transpose()?;
        Ok(AddressSpace {
            parent,
            occupied: RangeList::new(),
        })
    }

    /// Create an address space bounded by `parent_cidr`.
    pub fn with_parent(parent_cidr: &str) -> Result<AddressSpace> {
        AddressSpace::new(Some(parent_cidr))
    }

    pub fn parent(&self) -> Option<&Range> {
        self.parent.as_ref()
    }

    pub fn occupied(&self) -> &RangeList {
        &self.occupied
    }

    /// True when exactly this block is already held.
    pub fn is_reserved(&self, cidr: &str) -> bool {
        Range::parse(cidr).is_ok_and(|range| self.occupied.contains_str(range.as_str()))
    }

    /// Mark externally known blocks as occupied.
    ///
    /// Blocks may have mixed sizes. Already held blocks are skipped, and
    /// nothing is added when any entry fails to parse.
    pub fn reserve<I, S>(&mut self, cidrs: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = cidrs
            .into_iter()
            .map(|cidr| Range::parse(cidr.as_ref()))
            .collect::<Result<Vec<Range>>>()?;
        for range in parsed {
            if self.occupied.contains_str(range.as_str()) {
                continue;
            }
            log::debug!("reserve {range}");
            self.occupied.add([range]);
        }
        Ok(())
    }

    /// Drop the held block whose canonical text is exactly `cidr`.
    ///
    /// The input is not parsed, so `10.250.0.5/24` does not release
    /// `10.250.0.0/24`. Unknown blocks are ignored.
    pub fn release(&mut self, cidr: &str) {
        if self.occupied.retain_without(cidr) > 0 {
            log::info!("released {cidr}");
        }
    }

    /// Allocate the first free `/mask_ones` block from the default start.
    ///
    /// The default start is the beginning of the parent block, or
    /// [`DEFAULT_BASE`] when there is no parent.
    pub fn allocate(&mut self, mask_ones: u8) -> Result<String> {
        let start = self.default_start(mask_ones)?;
        self.allocate_from(mask_ones, start)
            .map(|range| range.to_string())
    }

    /// Allocate the first free `/mask_ones` block at or after `start_at_range`.
    ///
    /// The scan starts at the `/mask_ones` block holding the first address of
    /// `start_at_range`, which must be in the same family as the parent.
    pub fn allocate_with_preference(
        &mut self,
        mask_ones: u8,
        start_at_range: &str,
    ) -> Result<String> {
        let preferred = Range::parse(start_at_range)?;
        if let Some(parent) = &self.parent {
            if parent.bits() != preferred.bits() {
                return Err(AllocateError::parse(
                    start_at_range,
                    format!("address family does not match parent {parent}"),
                ));
            }
        }
        check_mask(mask_ones, preferred.bits())?;
        let start = Range::from_addr(preferred.network(), mask_ones)?;
        self.allocate_from(mask_ones, start)
            .map(|range| range.to_string())
    }

    /// Allocate a single address and return it without a prefix length.
    pub fn allocate_one_ip_address(&mut self) -> Result<String> {
        let bits = self.parent.as_ref().map_or(IPV4_BITS, Range::bits);
        let start = self.default_start(bits)?;
        self.allocate_from(bits, start)
            .map(|range| range.network().to_string())
    }

    /// Like [`AddressSpace::allocate`] but panics on failure.
    ///
    /// For fixture setup where the space is known to have room.
    pub fn must_allocate(&mut self, mask_ones: u8) -> String {
        self.allocate(mask_ones)
            .unwrap_or_else(|e| panic!("allocating /{mask_ones} in {self}: {e}"))
    }

    fn default_start(&self, mask_ones: u8) -> Result<Range> {
        let (base, bits) = match &self.parent {
            Some(parent) => (parent.network(), parent.bits()),
            None => (IpAddr::V4(DEFAULT_BASE), IPV4_BITS),
        };
        check_mask(mask_ones, bits)?;
        Range::from_addr(base, mask_ones)
    }

    fn allocate_from(&mut self, mask_ones: u8, start: Range) -> Result<Range> {
        let found = find_vacant(&self.occupied, start, mask_ones, self.parent.as_ref())?;
        log::info!("allocated {found}");
        self.occupied.add([found.clone()]);
        Ok(found)
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}({})", parent, self.occupied),
            None => write!(f, "{}", self.occupied),
        }
    }
}
