use thiserror::Error;

/// Narrowest word the engine accepts (one integer bit plus one fraction bit).
pub const MIN_WORD_LENGTH: u32 = 2;
/// Widest word the format accepts. Keeps `u + 2^(Wl-1)` and every kernel
/// accumulator inside `i64`; each function narrows it further.
pub const MAX_WORD_LENGTH: u32 = 62;
/// Widest word the logarithm accepts: `ln(2^-(Wl-1))` scaled by `2^(Wl-1)`,
/// i.e. `(Wl-1) * ln2`, must fit in `i64`.
pub const MAX_LN_WORD_LENGTH: u32 = 58;
/// Widest word the square root accepts: the gain-compensated result carries
/// `Wl` fractional bits on top of a `Wl/2`-bit root and must fit in `u64`.
pub const MAX_SQRT_WORD_LENGTH: u32 = 42;
/// Longest atanh table (and so the largest iteration count) the kernel schedules against.
pub const MAX_ITERATIONS: u32 = 72;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CordicError {
    #[error("Word length {0} outside supported range {MIN_WORD_LENGTH}..={MAX_WORD_LENGTH}")]
    UnsupportedWordLength(u32),
    #[error("Square root requires an even word length, got {0}")]
    OddWordLength(u32),
    #[error("Square root supports word lengths up to {MAX_SQRT_WORD_LENGTH}, got {0}")]
    SqrtWordLengthTooLarge(u32),
    #[error("Logarithm supports word lengths up to {MAX_LN_WORD_LENGTH}, got {0}")]
    LnWordLengthTooLarge(u32),
    #[error("Logarithm of zero is undefined")]
    LogOfZero,
    #[error("Operand {operand:#x} does not fit in {width} bits")]
    OperandOutOfRange { operand: u64, width: u32 },
    #[error("Iteration count {0} outside supported range 1..={MAX_ITERATIONS}")]
    UnsupportedIterations(u32),
    #[error("Atanh table holds {available} entries, {required} iterations requested")]
    TableTooShort { available: usize, required: u32 },
    #[error("Table built for Wl={table}, engine configured for Wl={engine}")]
    FormatMismatch { table: u32, engine: u32 },
    #[error("Gain estimated for {gain} iterations, {requested} iterations requested")]
    GainMismatch { gain: u32, requested: u32 },
    #[error("Logarithm composition overflowed i64")]
    CompositionOverflow,
}

/// UQ1.Fl fixed-point word: `Wl` bits, `Fl = Wl - 1` fractional bits.
///
/// A raw value `s` stands for the real magnitude `s / 2^(Wl-1)`, so the
/// representable range is `[0, 2)`. The format carries no state beyond the
/// width; it is passed by value into every stage of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPointFormat {
    word_length: u32,
}

impl FixedPointFormat {
    pub fn new(word_length: u32) -> Result<Self, CordicError> {
        if !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&word_length) {
            return Err(CordicError::UnsupportedWordLength(word_length));
        }
        Ok(Self { word_length })
    }

    #[inline]
    pub const fn word_length(self) -> u32 {
        self.word_length
    }

    #[inline]
    pub const fn fractional_bits(self) -> u32 {
        self.word_length - 1
    }

    /// Raw encoding of 1.0, `2^(Wl-1)`.
    #[inline]
    pub const fn one(self) -> i64 {
        1i64 << self.fractional_bits()
    }

    /// Largest raw operand, `2^Wl - 1`.
    #[inline]
    pub const fn max_raw(self) -> u64 {
        (1u64 << self.word_length) - 1
    }

    #[inline]
    pub const fn fits(self, raw: u64) -> bool {
        raw <= self.max_raw()
    }

    pub(crate) fn check_operand(self, raw: u64) -> Result<(), CordicError> {
        if self.fits(raw) {
            Ok(())
        } else {
            Err(CordicError::OperandOutOfRange {
                operand: raw,
                width: self.word_length,
            })
        }
    }

    /// Quantize a real value (round to nearest), clamping to the word.
    pub fn encode(self, value: f64) -> u64 {
        let scaled = (value * self.one() as f64).round();
        if scaled <= 0.0 {
            0
        } else if scaled >= self.max_raw() as f64 {
            self.max_raw()
        } else {
            scaled as u64
        }
    }

    /// Real value of a signed result carrying `Wl - 1` fractional bits.
    #[inline]
    pub fn to_real(self, raw: i64) -> f64 {
        raw as f64 / self.one() as f64
    }

    /// `round(ln(2) * 2^(Wl-1))`, the per-shift logarithm compensation.
    pub fn ln2(self) -> i64 {
        (core::f64::consts::LN_2 * self.one() as f64).round() as i64
    }
}
