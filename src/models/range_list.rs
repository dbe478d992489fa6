//! Occupancy set of CIDR blocks.

use super::Range;
use crate::error::{AllocateError, Result};
use itertools::Itertools;
use std::fmt;

/// Blocks considered claimed, kept in insertion order.
///
/// Entries are never re-sorted, the rendered form follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeList {
    ranges: Vec<Range>,
}

impl RangeList {
    pub fn new() -> RangeList {
        RangeList { ranges: Vec::new() }
    }

    /// Parse and append a batch of CIDRs that must all share one prefix length.
    ///
    /// Nothing is appended when any entry fails to parse or has a different
    /// prefix length than the first entry of the batch.
    pub fn add_strings<I, S>(&mut self, cidrs: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch: Vec<Range> = Vec::new();
        for cidr in cidrs {
            let range = Range::parse(cidr.as_ref())?;
            if let Some(expected) = batch.first().map(Range::prefix_len) {
                if range.prefix_len() != expected {
                    return Err(AllocateError::MaskBits {
                        expected,
                        found: range.prefix_len(),
                        cidr: cidr.as_ref().to_string(),
                    });
                }
            }
            batch.push(range);
        }
        self.ranges.extend(batch);
        Ok(())
    }

    /// Append ranges without any validation.
    pub fn add<I>(&mut self, ranges: I)
    where
        I: IntoIterator<Item = Range>,
    {
        self.ranges.extend(ranges);
    }

    /// True when any held range overlaps `candidate`.
    pub fn overlaps(&self, candidate: &Range) -> bool {
        self.overlapping(candidate).is_some()
    }

    /// The first held range that overlaps `candidate`.
    pub fn overlapping(&self, candidate: &Range) -> Option<&Range> {
        self.ranges.iter().find(|r| r.overlaps(candidate))
    }

    /// True when a range with exactly this canonical text is held.
    pub fn contains_str(&self, cidr: &str) -> bool {
        self.ranges.iter().any(|r| r.as_str() == cidr)
    }

    /// Rebuild the list without entries whose canonical text equals `cidr`.
    ///
    /// Returns the number of removed entries.
    pub fn retain_without(&mut self, cidr: &str) -> usize {
        let before = self.ranges.len();
        self.ranges.retain(|r| r.as_str() != cidr);
        before - self.ranges.len()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.ranges.iter()
    }
}

impl<'a> IntoIterator for &'a RangeList {
    type Item = &'a Range;
    type IntoIter = std::slice::Iter<'a, Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl fmt::Display for RangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ranges.iter().join(" "))
    }
}
