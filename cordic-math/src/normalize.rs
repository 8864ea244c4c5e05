//! Operand normalization into the kernel's convergence domain.
//!
//! The logarithm and the square root scan for the leading one the same way
//! but apply different shift policies, so they are two separate operations.

use crate::fixed_point::FixedPointFormat;

/// An operand shifted left by `shift` bits. The composer undoes `shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedOperand {
    pub value: u64,
    pub shift: u32,
}

/// Zero bits above the leading one inside a `Wl`-bit word; `Wl` for zero.
///
/// Bounded by construction: `s` is masked to the word, so the count never
/// exceeds the width and never wraps.
#[inline]
pub fn leading_zeros_in_word(s: u64, format: FixedPointFormat) -> u32 {
    let wl = format.word_length();
    let masked = s & format.max_raw();
    masked.leading_zeros() - (u64::BITS - wl)
}

/// Shift `s` so its leading one lands on bit `Wl - 1`, i.e. `u` in `[1, 2)`.
///
/// `s == 0` has no leading one; it comes back as `{ 0, Wl }` and the caller
/// must reject it before taking a logarithm.
pub fn normalize_ln(s: u64, format: FixedPointFormat) -> NormalizedOperand {
    let shift = leading_zeros_in_word(s, format);
    NormalizedOperand {
        value: if shift >= u64::BITS { 0 } else { s << shift },
        shift,
    }
}

/// Like [`normalize_ln`] but forces an even shift, since the root is
/// rescaled by `shift / 2`.
///
/// An odd count above one drops by one, leaving `u` in `[0.5, 1)`; a count of
/// exactly one is promoted to two, which places `u` in `[2, 4)` in UQ1.Fl terms
/// (one bit above the word, still inside the kernel's convergence domain).
/// Zero yields a shift of `Wl`.
pub fn normalize_sqrt(s: u64, format: FixedPointFormat) -> NormalizedOperand {
    let mut shift = leading_zeros_in_word(s, format);
    if shift > 1 && shift % 2 == 1 {
        shift -= 1;
    }
    if shift == 1 {
        shift = 2;
    }
    NormalizedOperand {
        value: if shift >= u64::BITS { 0 } else { s << shift },
        shift,
    }
}
