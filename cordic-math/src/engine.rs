use crate::fixed_point::{CordicError, FixedPointFormat, MAX_LN_WORD_LENGTH, MAX_SQRT_WORD_LENGTH};
use crate::kernel::KernelState;
use crate::normalize::{normalize_ln, normalize_sqrt};
use crate::schedule::RepeatSchedule;
use crate::tables::{check_iterations, AtanhTable, SqrtGain};

/// Natural logarithm of the UQ1.Fl operand `s`.
///
/// Returns `ln(s / 2^(Wl-1))` as a signed value with `Wl - 1` fractional
/// bits: `2z - n * ln2`, where `z` is the kernel's angle and `n` the
/// normalization shift.
pub fn compute_ln(
    s: u64,
    format: FixedPointFormat,
    n_iter: u32,
    table: &AtanhTable,
    ln2: i64,
) -> Result<i64, CordicError> {
    check_ln_format(format)?;
    if s == 0 {
        return Err(CordicError::LogOfZero);
    }
    format.check_operand(s)?;
    check_iterations(n_iter)?;
    table.check_covers(format, n_iter)?;

    let operand = normalize_ln(s, format);
    let mut state = KernelState::for_ln(operand.value, format);
    state.vector(RepeatSchedule::new(n_iter), Some(table));

    // Bounded for a format-derived `ln2`; a caller-supplied one may not be.
    let result = i64::from(operand.shift)
        .checked_mul(ln2)
        .and_then(|offset| (state.z << 1).checked_sub(offset))
        .ok_or(CordicError::CompositionOverflow)?;
    tracing::trace!(s, shift = operand.shift, z = state.z, result, "ln composed");
    Ok(result)
}

fn check_ln_format(format: FixedPointFormat) -> Result<(), CordicError> {
    let wl = format.word_length();
    if wl > MAX_LN_WORD_LENGTH {
        return Err(CordicError::LnWordLengthTooLarge(wl));
    }
    Ok(())
}

fn check_sqrt_format(format: FixedPointFormat) -> Result<(), CordicError> {
    let wl = format.word_length();
    if wl % 2 == 1 {
        return Err(CordicError::OddWordLength(wl));
    }
    if wl > MAX_SQRT_WORD_LENGTH {
        return Err(CordicError::SqrtWordLengthTooLarge(wl));
    }
    Ok(())
}

/// Square root of the `Wl`-bit integer operand `s`.
///
/// The result carries `Wl` fractional bits: `result / 2^Wl ~= sqrt(s)`.
/// The kernel output, rescaled by `n / 2`, holds the root with `Wl / 2`
/// fractional bits; multiplying by the fixed-point gain (itself `Wl / 2`
/// fractional bits) lands on `Wl`. Zero short-circuits to zero because it
/// has no leading one to normalize against.
pub fn compute_sqrt(
    s: u64,
    format: FixedPointFormat,
    n_iter: u32,
    gain: &SqrtGain,
) -> Result<u64, CordicError> {
    check_sqrt_format(format)?;
    format.check_operand(s)?;
    check_iterations(n_iter)?;
    if gain.n_iter() != n_iter {
        return Err(CordicError::GainMismatch {
            gain: gain.n_iter(),
            requested: n_iter,
        });
    }
    if s == 0 {
        return Ok(0);
    }

    let operand = normalize_sqrt(s, format);
    let mut state = KernelState::for_sqrt(operand.value, format);
    state.vector(RepeatSchedule::new(n_iter), None);

    // x > 0 after vectoring from x > |y|.
    let root = (state.x >> (operand.shift / 2)) as u64;
    let result = root * gain.to_fixed(format);
    tracing::trace!(s, shift = operand.shift, x = state.x, result, "sqrt composed");
    Ok(result)
}

/// Logarithm configuration: word format, iteration count, atanh table and
/// `ln(2)` constant, built once and shared read-only across calls.
#[derive(Debug, Clone)]
pub struct LnEngine {
    format: FixedPointFormat,
    n_iter: u32,
    table: AtanhTable,
    ln2: i64,
}

impl LnEngine {
    pub fn new(format: FixedPointFormat, n_iter: u32) -> Result<Self, CordicError> {
        Self::with_table_len(format, n_iter, n_iter)
    }

    /// Build a table longer than `n_iter`, e.g. the full extended table.
    pub fn with_table_len(
        format: FixedPointFormat,
        n_iter: u32,
        table_len: u32,
    ) -> Result<Self, CordicError> {
        check_ln_format(format)?;
        check_iterations(n_iter)?;
        let table = AtanhTable::build(format, table_len)?;
        table.check_covers(format, n_iter)?;
        Ok(Self {
            format,
            n_iter,
            table,
            ln2: format.ln2(),
        })
    }

    pub fn format(&self) -> FixedPointFormat {
        self.format
    }

    pub fn n_iter(&self) -> u32 {
        self.n_iter
    }

    pub fn table(&self) -> &AtanhTable {
        &self.table
    }

    pub fn ln2(&self) -> i64 {
        self.ln2
    }

    pub fn ln(&self, s: u64) -> Result<i64, CordicError> {
        compute_ln(s, self.format, self.n_iter, &self.table, self.ln2)
    }

    pub fn ln_real(&self, s: u64) -> Result<f64, CordicError> {
        self.ln(s).map(|raw| self.format.to_real(raw))
    }
}

/// Square-root configuration with its precomputed gain.
#[derive(Debug, Clone)]
pub struct SqrtEngine {
    format: FixedPointFormat,
    n_iter: u32,
    gain: SqrtGain,
}

impl SqrtEngine {
    pub fn new(format: FixedPointFormat, n_iter: u32) -> Result<Self, CordicError> {
        check_sqrt_format(format)?;
        let gain = SqrtGain::estimate(n_iter)?;
        Ok(Self { format, n_iter, gain })
    }

    pub fn format(&self) -> FixedPointFormat {
        self.format
    }

    pub fn n_iter(&self) -> u32 {
        self.n_iter
    }

    pub fn gain(&self) -> &SqrtGain {
        &self.gain
    }

    pub fn sqrt(&self, s: u64) -> Result<u64, CordicError> {
        compute_sqrt(s, self.format, self.n_iter, &self.gain)
    }

    /// Root as a real number (`result / 2^Wl`).
    pub fn sqrt_real(&self, s: u64) -> Result<f64, CordicError> {
        let scale = (1u64 << self.format.word_length()) as f64;
        self.sqrt(s).map(|raw| raw as f64 / scale)
    }
}
