//! Error types for CIDR allocation.

use thiserror::Error;

/// Result type for allocation operations.
pub type Result<T> = std::result::Result<T, AllocateError>;

/// Errors raised while parsing ranges or carving blocks from an address space.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocateError {
    /// Malformed CIDR text.
    #[error("invalid cidr '{cidr}': {reason}")]
    Parse { cidr: String, reason: String },

    /// A validated batch mixed prefix lengths.
    #[error("all ranges must have same bits, expected {expected} but encountered {found} for range '{cidr}'")]
    MaskBits {
        expected: u8,
        found: u8,
        cidr: String,
    },

    /// Requested prefix length does not fit the address family.
    #[error("invalid mask ones {ones} for {bits} bit address")]
    InvalidMask { ones: u8, bits: u8 },

    /// Scan ran off the end of the address family.
    #[error("unable to find vacant cidr slot")]
    NoVacantSlot,

    /// Scan ran past the end of the parent block.
    #[error("address space exhausted")]
    AddressSpaceExhausted,

    /// A shared address space lock was poisoned by a panicking holder.
    #[error("address space lock poisoned: {0}")]
    LockPoisoned(String),
}

impl AllocateError {
    pub(crate) fn parse(cidr: &str, reason: impl Into<String>) -> Self {
        AllocateError::Parse {
            cidr: cidr.to_string(),
            reason: reason.into(),
        }
    }

    /// True when no free block was found, the only kind worth retrying later.
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self,
            AllocateError::NoVacantSlot | AllocateError::AddressSpaceExhausted
        )
    }
}
