//! # mini-cordic
//!
//! Umbrella crate for the workspace: the fixed-point CORDIC engines
//! ([`math`]) and the accuracy sweep harness ([`sweep`]).

pub use cordic_math as math;
pub use cordic_sweep as sweep;

pub use cordic_math::{CordicError, FixedPointFormat, LnEngine, SqrtEngine};
