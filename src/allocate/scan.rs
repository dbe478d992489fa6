//! Forward bump scan for a vacant block.

use crate::error::{AllocateError, Result};
use crate::models::{Range, RangeList};

/// Check that `mask_ones` fits a `bits` wide family.
pub(crate) fn check_mask(mask_ones: u8, bits: u8) -> Result<()> {
    if mask_ones > bits {
        return Err(AllocateError::InvalidMask {
            ones: mask_ones,
            bits,
        });
    }
    Ok(())
}

/// Walk forward from `candidate` until a block clear of `occupied` is found.
///
/// With `within` set, a candidate below the parent jumps straight to the
/// parent's first block, candidates not inside the parent are skipped and a
/// candidate starting past its end fails with
/// [`AllocateError::AddressSpaceExhausted`]. Running off the end of the
/// address family fails with [`AllocateError::NoVacantSlot`], parent or not.
///
/// After a collision the walk resumes after whichever of the candidate and
/// the colliding block ends last. Every aligned block in between overlaps
/// the colliding one, so this finds the same block as stepping one by one.
///
/// `candidate` must be in the same family as `within`.
pub(crate) fn find_vacant(
    occupied: &RangeList,
    mut candidate: Range,
    mask_ones: u8,
    within: Option<&Range>,
) -> Result<Range> {
    loop {
        let step_from = match within {
            Some(parent) if candidate.first() > parent.last() => {
                log::warn!("{candidate} is past the end of {parent}");
                return Err(AllocateError::AddressSpaceExhausted);
            }
            Some(parent) if candidate.last() < parent.first() => {
                log::debug!("{candidate} is below {parent}");
                candidate = Range::from_addr(parent.network(), mask_ones)?;
                continue;
            }
            Some(parent) if !parent.contains(&candidate) => {
                log::debug!("{candidate} is not inside {parent}");
                candidate.clone()
            }
            _ => match occupied.overlapping(&candidate) {
                Some(hit) if hit.last() > candidate.last() => {
                    log::debug!("{candidate} collides with {hit}");
                    hit.clone()
                }
                Some(hit) => {
                    log::debug!("{candidate} collides with {hit}");
                    candidate.clone()
                }
                None => return Ok(candidate),
            },
        };
        candidate = match step_from.next_with_ones(mask_ones) {
            Some(next) => next,
            None => {
                log::warn!("no vacant /{mask_ones} after {step_from}");
                return Err(AllocateError::NoVacantSlot);
            }
        };
    }
}
