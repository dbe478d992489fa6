//! CIDR block arithmetic for IPv4 and IPv6.
//!
//! A [`Range`] stores the first and last address of a block as `u128`
//! integers, so both address families go through the same comparisons.
//! IPv4 values are widened, IPv6 values fit exactly.

use crate::error::{AllocateError, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Width of an IPv4 address in bits.
pub const IPV4_BITS: u8 = 32;
/// Width of an IPv6 address in bits.
pub const IPV6_BITS: u8 = 128;

/// Largest address value of a `bits` wide family.
fn family_max(bits: u8) -> u128 {
    if bits >= IPV6_BITS {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/// Convert a prefix length to a network mask within a `bits` wide family.
///
/// # Examples
/// ```
/// use cidr_allocate::models::mask_for;
/// assert_eq!(mask_for(24, 32).unwrap(), 0xFFFF_FF00);
/// ```
pub fn mask_for(ones: u8, bits: u8) -> Result<u128> {
    if ones > bits {
        return Err(AllocateError::InvalidMask { ones, bits });
    }
    let host_bits = u32::from(bits - ones);
    let host_mask = if host_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    };
    Ok(family_max(bits) & !host_mask)
}

/// Integer value of an address.
pub fn addr_to_int(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

/// Address of an integer value in a `bits` wide family.
fn int_to_addr(value: u128, bits: u8) -> IpAddr {
    if bits == IPV4_BITS {
        IpAddr::V4(Ipv4Addr::from(value as u32))
    } else {
        IpAddr::V6(Ipv6Addr::from(value))
    }
}

fn family_bits(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => IPV4_BITS,
        IpAddr::V6(_) => IPV6_BITS,
    }
}

/// One CIDR block.
///
/// Immutable once built. `first` is the network address and `last` has
/// every host bit set, so `first <= last` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    s: String,
    first: u128,
    last: u128,
    ones: u8,
    bits: u8,
}

impl Range {
    /// Parse a CIDR string such as `"10.250.0.0/22"` or `"2001:db8::/64"`.
    ///
    /// Host bits are masked away, so `"10.0.0.5/24"` parses as `10.0.0.0/24`.
    pub fn parse(cidr: &str) -> Result<Range> {
        let cidr = cidr.trim();
        let (addr, ones) = cidr
            .split_once('/')
            .ok_or_else(|| AllocateError::parse(cidr, "missing prefix length"))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| AllocateError::parse(cidr, format!("invalid address {addr}")))?;
        let ones: u8 = ones
            .parse()
            .map_err(|_| AllocateError::parse(cidr, format!("invalid prefix length {ones}")))?;
        Range::from_addr(addr, ones).map_err(|e| AllocateError::parse(cidr, e.to_string()))
    }

    /// The `ones` sized block containing `addr`.
    pub fn from_addr(addr: IpAddr, ones: u8) -> Result<Range> {
        Range::from_int(addr_to_int(addr), ones, family_bits(&addr))
    }

    fn from_int(value: u128, ones: u8, bits: u8) -> Result<Range> {
        let mask = mask_for(ones, bits)?;
        let first = value & mask;
        let last = first | (mask ^ family_max(bits));
        Ok(Range {
            s: format!("{}/{}", int_to_addr(first, bits), ones),
            first,
            last,
            ones,
            bits,
        })
    }

    /// Canonical CIDR text.
    pub fn as_str(&self) -> &str {
        &self.s
    }

    pub fn first(&self) -> u128 {
        self.first
    }

    pub fn last(&self) -> u128 {
        self.last
    }

    /// Prefix length of the block.
    pub fn prefix_len(&self) -> u8 {
        self.ones
    }

    /// Width of the address family, 32 or 128.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn is_ipv4(&self) -> bool {
        self.bits == IPV4_BITS
    }

    /// Network address of the block.
    pub fn network(&self) -> IpAddr {
        int_to_addr(self.first, self.bits)
    }

    /// Highest address of the block.
    pub fn broadcast(&self) -> IpAddr {
        int_to_addr(self.last, self.bits)
    }

    /// True when the blocks share at least one address.
    ///
    /// Blocks of different families never overlap.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.bits == other.bits && self.first <= other.last && other.first <= self.last
    }

    /// True when `other` lies entirely inside this block.
    pub fn contains(&self, other: &Range) -> bool {
        self.bits == other.bits && other.first >= self.first && other.last <= self.last
    }

    /// Number of addresses in the block.
    ///
    /// Only `None` for `::/0`, whose size does not fit in `u128`.
    pub fn length(&self) -> Option<u128> {
        (self.last - self.first).checked_add(1)
    }

    /// The block of the same size right after this one.
    pub fn next(&self) -> Option<Range> {
        self.next_with_ones(self.ones)
    }

    /// The first `ones` sized block that starts after this block ends.
    ///
    /// Returns `None` when that block would fall off the end of the address
    /// family, or when `ones` does not fit the family.
    pub fn next_with_ones(&self, ones: u8) -> Option<Range> {
        let host_mask = mask_for(ones, self.bits).ok()? ^ family_max(self.bits);
        let after = self.last.checked_add(1)?;
        let start = if after & host_mask == 0 {
            after
        } else {
            (after | host_mask).checked_add(1)?
        };
        if start > family_max(self.bits) {
            return None;
        }
        Range::from_int(start, ones, self.bits).ok()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.s)
    }
}

impl FromStr for Range {
    type Err = AllocateError;

    fn from_str(s: &str) -> Result<Range> {
        Range::parse(s)
    }
}

impl Ord for Range {
    fn cmp(&self, other: &Range) -> Ordering {
        self.bits
            .cmp(&other.bits)
            .then(self.first.cmp(&other.first))
            .then(self.ones.cmp(&other.ones))
    }
}

impl PartialOrd for Range {
    fn partial_cmp(&self, other: &Range) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Range {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.s)
    }
}

impl<'de> Deserialize<'de> for Range {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Range, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Range::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(cidr: &str) -> Range {
        Range::parse(cidr).unwrap()
    }

    #[test]
    fn test_mask_for() {
        assert_eq!(mask_for(0, 32).unwrap(), 0x0000_0000);
        assert_eq!(mask_for(8, 32).unwrap(), 0xFF00_0000);
        assert_eq!(mask_for(16, 32).unwrap(), 0xFFFF_0000);
        assert_eq!(mask_for(32, 32).unwrap(), 0xFFFF_FFFF);
        assert_eq!(mask_for(0, 128).unwrap(), 0);
        assert_eq!(mask_for(128, 128).unwrap(), u128::MAX);
        assert_eq!(mask_for(64, 128).unwrap(), 0xFFFF_FFFF_FFFF_FFFF << 64);
        assert_eq!(
            mask_for(33, 32).unwrap_err(),
            AllocateError::InvalidMask { ones: 33, bits: 32 }
        );
    }

    #[test]
    fn test_parse_ipv4() {
        let range = r("10.250.0.0/22");
        assert_eq!(range.to_string(), "10.250.0.0/22");
        assert_eq!(range.network(), "10.250.0.0".parse::<IpAddr>().unwrap());
        assert_eq!(range.broadcast(), "10.250.3.255".parse::<IpAddr>().unwrap());
        assert_eq!(range.prefix_len(), 22);
        assert!(range.is_ipv4());
        assert_eq!(range.length(), Some(1024));
    }

    #[test]
    fn test_parse_masks_host_bits() {
        assert_eq!(r("10.0.0.5/24").to_string(), "10.0.0.0/24");
        assert_eq!(r(" 192.168.1.42/16 ").to_string(), "192.168.0.0/16");
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["10.0.0.0", "10.0.0.0/33", "10.0.0/8", "abc/8", "10.0.0.0/x", "::/129", ""] {
            let err = Range::parse(bad).unwrap_err();
            assert!(
                matches!(err, AllocateError::Parse { .. }),
                "expected parse error for '{bad}', got {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_ipv6() {
        let range = r("2001:0db8:85a3:0000:0000:8a2e:0370:7334/64");
        assert_eq!(range.to_string(), "2001:db8:85a3::/64");
        assert_eq!(range.bits(), 128);
        assert_eq!(range.first(), 0x2001_0db8_85a3_0000_0000_0000_0000_0000);
        assert_eq!(range.last(), 0x2001_0db8_85a3_0000_ffff_ffff_ffff_ffff);
        assert_eq!(range.length(), Some(1u128 << 64));
        assert_eq!(r("::/0").length(), None);
    }

    #[test]
    fn test_round_trip() {
        for cidr in [
            "10.250.0.0/16",
            "0.0.0.0/0",
            "255.255.255.255/32",
            "2001:db8::/32",
            "::/0",
            "fe80::1/128",
        ] {
            assert_eq!(r(cidr).to_string(), cidr);
            assert_eq!(r(&r(cidr).to_string()), r(cidr));
        }
    }

    #[test]
    fn test_overlaps_and_contains() {
        let big = r("10.0.0.0/8");
        let small = r("10.0.10.64/26");
        let other = r("11.0.0.0/8");
        assert!(big.overlaps(&small));
        assert!(small.overlaps(&big));
        assert!(!big.overlaps(&other));
        assert!(big.contains(&small));
        assert!(!small.contains(&big));
        assert!(big.contains(&big));

        // adjacent blocks touch but do not overlap
        assert!(!r("10.0.0.0/25").overlaps(&r("10.0.0.128/25")));
    }

    #[test]
    fn test_overlap_symmetry() {
        let samples = [
            "10.0.0.0/8",
            "10.250.0.0/22",
            "10.250.4.0/22",
            "10.250.0.0/16",
            "0.0.0.0/0",
            "::a00:0/104",
            "2001:db8::/32",
            "2001:db8:85a3::/64",
            "2001:db8:85a3:1::/64",
            "::/0",
        ];
        for a in samples {
            for b in samples {
                assert_eq!(
                    r(a).overlaps(&r(b)),
                    r(b).overlaps(&r(a)),
                    "overlap of {a} and {b} is not symmetric"
                );
            }
        }
        // families never mix, even when the integers coincide
        assert!(!r("10.0.0.0/8").overlaps(&r("::a00:0/104")));
    }

    #[test]
    fn test_next() {
        assert_eq!(r("10.1.1.0/28").next().unwrap().to_string(), "10.1.1.16/28");
        assert_eq!(r("10.1.1.0/29").next().unwrap().to_string(), "10.1.1.8/29");
        assert_eq!(r("192.168.1.0/8").next().unwrap().to_string(), "193.0.0.0/8");
        assert_eq!(r("10.2.3.4/16").next().unwrap().to_string(), "10.3.0.0/16");
        assert_eq!(
            r("2001:db8:85a3::/64").next().unwrap().to_string(),
            "2001:db8:85a3:1::/64"
        );
    }

    #[test]
    fn test_next_with_ones() {
        assert_eq!(
            r("192.0.0.0/8").next_with_ones(16).unwrap().to_string(),
            "193.0.0.0/16"
        );
        assert_eq!(
            r("10.2.3.4/16").next_with_ones(24).unwrap().to_string(),
            "10.3.0.0/24"
        );
        let next = r("10.18.126.0/24").next_with_ones(28).unwrap();
        assert_eq!(next.to_string(), "10.18.127.0/28");
        let next = next.next_with_ones(24).unwrap();
        assert_eq!(next.to_string(), "10.18.128.0/24");
        assert_eq!(
            r("10.250.0.0/17").next_with_ones(18).unwrap().to_string(),
            "10.250.128.0/18"
        );
        assert!(r("10.0.0.0/24").next_with_ones(33).is_none());
    }

    #[test]
    fn test_next_overflow() {
        assert!(r("255.255.255.0/24").next().is_none());
        assert!(r("255.255.255.255/32").next().is_none());
        assert!(r("255.0.0.0/8").next_with_ones(24).is_none());
        assert!(r("254.0.0.0/8").next_with_ones(4).is_none());
        assert!(r("ffff:ffff:ffff:ffff::/64").next().is_none());
        assert!(r("::/0").next().is_none());
    }

    #[test]
    fn test_ordering() {
        let mut ranges = vec![r("10.0.10.64/26"), r("10.0.0.0/8"), r("10.0.10.0/24")];
        ranges.sort();
        let sorted: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
        assert_eq!(sorted, vec!["10.0.0.0/8", "10.0.10.0/24", "10.0.10.64/26"]);
    }

    #[test]
    fn test_serde() {
        let range = r("10.250.0.0/22");
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "\"10.250.0.0/22\"");
        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
        assert!(serde_json::from_str::<Range>("\"10.250.0.0\"").is_err());
    }
}
