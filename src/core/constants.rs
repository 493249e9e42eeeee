//! core::constants
//!
//! Protocol and compiler constants.
//!
//! Every fixed number the codec or the query compiler relies on lives here,
//! so tests and callers can refer to them by name instead of repeating
//! literals.

use std::num::NonZeroU32;

/// Number of bits in a hat identifier.
pub const HAT_ID_BITS: u32 = 256;

/// Number of bytes in a hat identifier.
pub const HAT_ID_BYTES: usize = 32;

/// Hex digits in the canonical identifier form (excluding `0x`).
pub const HAT_ID_HEX_DIGITS: usize = 64;

/// Hex digits occupied by the domain (tree id) segment.
pub const DOMAIN_HEX_DIGITS: usize = 8;

/// Hex digits occupied by each level segment.
pub const LEVEL_HEX_DIGITS: usize = 4;

/// Deepest level a hat can sit at below its top hat.
pub const MAX_LEVELS: u8 = 14;

/// Largest child index a single level segment can hold.
pub const MAX_CHILDREN_PER_LEVEL: u16 = u16::MAX;

/// Maximum number of tokens in a dotted path (domain plus every level).
pub const MAX_DOTTED_SEGMENTS: usize = 1 + MAX_LEVELS as usize;

/// Page size used for a relation when no filter overrides it.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(1000) {
    Some(size) => size,
    None => unreachable!(),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_fill_the_identifier() {
        assert_eq!(
            DOMAIN_HEX_DIGITS + LEVEL_HEX_DIGITS * MAX_LEVELS as usize,
            HAT_ID_HEX_DIGITS
        );
        assert_eq!(HAT_ID_HEX_DIGITS * 4, HAT_ID_BITS as usize);
        assert_eq!(HAT_ID_BYTES * 2, HAT_ID_HEX_DIGITS);
    }
}
