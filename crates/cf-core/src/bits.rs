//! Bit operations on 32-bit capability words.
//!
//! All helpers are `const fn` so the registry tables can be validated at
//! compile time with the same code the probers use at runtime.

/// Returns true if every bit of `mask` is set in `word`.
///
/// An empty mask never matches.
#[inline]
pub const fn has_mask(word: u32, mask: u32) -> bool {
    mask != 0 && word & mask == mask
}

/// Returns `word` with the bits of `mask` set.
#[inline]
pub const fn set_mask(word: u32, mask: u32) -> u32 {
    word | mask
}

/// Returns true if `mask` has exactly one bit set.
#[inline]
pub const fn is_single_bit(mask: u32) -> bool {
    mask.is_power_of_two()
}

/// Position of the single bit in `mask` (0 = least significant).
#[inline]
pub const fn bit_index(mask: u32) -> u32 {
    mask.trailing_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_mask_requires_non_empty_mask() {
        assert!(has_mask(0x1000_0000, 0x1000_0000));
        assert!(!has_mask(0x1000_0000, 0x0800_0000));
        assert!(!has_mask(u32::MAX, 0));
    }

    #[test]
    fn test_set_mask() {
        assert_eq!(set_mask(0b0001, 0b0100), 0b0101);
        assert_eq!(set_mask(0b0101, 0b0100), 0b0101);
    }

    #[test]
    fn test_is_single_bit() {
        assert!(is_single_bit(1));
        assert!(is_single_bit(0x8000_0000));
        assert!(!is_single_bit(0));
        assert!(!is_single_bit(0b0110));
    }

    #[test]
    fn test_bit_index() {
        assert_eq!(bit_index(1), 0);
        assert_eq!(bit_index(0x0000_0080), 7);
        assert_eq!(bit_index(0x8000_0000), 31);
    }
}
