use crate::fixed_point::{CordicError, FixedPointFormat, MAX_ITERATIONS};
use crate::schedule::RepeatSchedule;

pub(crate) fn check_iterations(n_iter: u32) -> Result<(), CordicError> {
    if n_iter == 0 || n_iter > MAX_ITERATIONS {
        return Err(CordicError::UnsupportedIterations(n_iter));
    }
    Ok(())
}

/// Fixed-point `atanh(2^-i)` constants for `i = 1..=len`, scaled by `2^(Wl-1)`.
///
/// Built once per `(Wl, n_iter)` and only read afterwards. The table may be
/// longer than `Wl`: entries past the word width round to small integers
/// (eventually zero) but keep the kernel's indexing total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtanhTable {
    format: FixedPointFormat,
    entries: Vec<i64>,
}

impl AtanhTable {
    pub fn build(format: FixedPointFormat, n_iter: u32) -> Result<Self, CordicError> {
        check_iterations(n_iter)?;
        let scale = format.one() as f64;
        let entries: Vec<i64> = (1..=n_iter)
            .map(|i| {
                // atanh(2^-i) <= atanh(0.5), so the scaled value stays below one.
                let angle = 2f64.powi(-(i as i32)).atanh();
                (scale * angle).round() as i64
            })
            .collect();
        tracing::debug!(wl = format.word_length(), n_iter, "built atanh table");
        Ok(Self { format, entries })
    }

    pub fn format(&self) -> FixedPointFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for iteration index `i` (1-based).
    pub fn get(&self, i: u32) -> Option<i64> {
        let idx = (i as usize).checked_sub(1)?;
        self.entries.get(idx).copied()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.entries
    }

    /// Confirm the table can drive `n_iter` iterations in `format`.
    pub(crate) fn check_covers(&self, format: FixedPointFormat, n_iter: u32) -> Result<(), CordicError> {
        if self.format != format {
            return Err(CordicError::FormatMismatch {
                table: self.format.word_length(),
                engine: format.word_length(),
            });
        }
        if self.entries.len() < n_iter as usize {
            return Err(CordicError::TableTooShort {
                available: self.entries.len(),
                required: n_iter,
            });
        }
        Ok(())
    }
}

/// Hyperbolic CORDIC gain compensation `1 / prod(sqrt(1 - 2^(-2i)))`.
///
/// The product runs over the same repeat schedule as the kernel, so repeated
/// indices contribute twice. Converges to about 1.2075 as `n_iter` grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtGain {
    n_iter: u32,
    value: f64,
}

impl SqrtGain {
    pub fn estimate(n_iter: u32) -> Result<Self, CordicError> {
        check_iterations(n_iter)?;
        let shrink: f64 = RepeatSchedule::new(n_iter)
            .map(|i| (1.0 - 2f64.powi(-2 * i as i32)).sqrt())
            .product();
        let value = 1.0 / shrink;
        tracing::debug!(n_iter, gain = value, "estimated sqrt gain");
        Ok(Self { n_iter, value })
    }

    pub fn n_iter(&self) -> u32 {
        self.n_iter
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// `ceil(gain * 2^(Wl/2))`. Rounding up keeps the compensated root from
    /// sitting systematically below the true magnitude.
    pub fn to_fixed(&self, format: FixedPointFormat) -> u64 {
        let scale = (1u64 << (format.word_length() / 2)) as f64;
        (self.value * scale).ceil() as u64
    }
}
