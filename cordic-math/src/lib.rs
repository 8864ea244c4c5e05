//! # cordic-math
//!
//! Multiplication-free square root and natural logarithm on UQ1.Fl
//! fixed-point words, computed with hyperbolic CORDIC in vectoring mode.
//!
//! Each call runs a fixed, input-independent number of shift-add steps
//! ([`RepeatSchedule`]) over private accumulators ([`KernelState`]) and only
//! reads the precomputed [`AtanhTable`] / [`SqrtGain`], so a single
//! [`LnEngine`] or [`SqrtEngine`] can be shared freely across threads.
//!
//! Pipeline per call: normalize → vector → compose.
//!
//! **Minimal dependencies** (`thiserror` for errors, `tracing` for diagnostics).

pub mod engine;
pub mod fixed_point;
pub mod kernel;
pub mod normalize;
pub mod schedule;
pub mod tables;

pub use engine::{compute_ln, compute_sqrt, LnEngine, SqrtEngine};
pub use fixed_point::{
    CordicError, FixedPointFormat, MAX_ITERATIONS, MAX_LN_WORD_LENGTH, MAX_SQRT_WORD_LENGTH,
    MAX_WORD_LENGTH,
    MIN_WORD_LENGTH,
};
pub use kernel::KernelState;
pub use normalize::{normalize_ln, normalize_sqrt, NormalizedOperand};
pub use schedule::RepeatSchedule;
pub use tables::{AtanhTable, SqrtGain};

/// Fixed-point `atanh(2^-i)` table for `i = 1..=n_iter`.
pub fn build_atanh_table(format: FixedPointFormat, n_iter: u32) -> Result<AtanhTable, CordicError> {
    AtanhTable::build(format, n_iter)
}

/// Square-root gain compensation for `n_iter` scheduled iterations.
pub fn estimate_sqrt_gain(n_iter: u32) -> Result<SqrtGain, CordicError> {
    SqrtGain::estimate(n_iter)
}
