//! # cordic-sweep
//!
//! Exhaustive accuracy sweeps for the `cordic-math` engines.
//!
//! A [`SweepConfig`] names a function, a word length and an operand range.
//! [`run_sweep`] splits the range into contiguous partitions, evaluates them in
//! parallel against an f64 reference, and merges the per-partition
//! [`ErrorStats`]. The resulting [`SweepReport`] is written as a plain-text
//! error table ([`save_report`]) and optionally as a JSON summary.

pub mod config;
pub mod report;
pub mod stats;
pub mod sweep;

use cordic_math::CordicError;
use thiserror::Error;

pub use config::{Function, SweepConfig, DEFAULT_MAX_ROWS};
pub use report::{
    atanh_constants, save_report, save_summary_json, write_atanh_listing, write_report,
    SweepSummary,
};
pub use stats::{error_percent, ErrorStats, ReportRow};
pub use sweep::{partition, run_sweep, Evaluator, SweepReport};

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Engine error: {0}")]
    Engine(#[from] CordicError),

    #[error("Operand range must start at 1 or above")]
    ZeroStart,

    #[error("Empty operand range {start}..={end}")]
    EmptyRange { start: u64, end: u64 },

    #[error("Range end {end:#x} does not fit a {width}-bit word")]
    RangeTooWide { end: u64, width: u32 },

    #[error("Partition count must be positive")]
    NoPartitions,

    #[error("Invalid error threshold: {0}")]
    InvalidThreshold(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
