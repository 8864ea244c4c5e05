use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use cordic_math::{FixedPointFormat, LnEngine, SqrtEngine};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Function, SweepConfig};
use crate::stats::{ErrorStats, ReportRow};
use crate::SweepError;

/// Split `range` into at most `parts` contiguous, non-overlapping chunks that
/// cover it exactly. Earlier chunks absorb the remainder.
pub fn partition(range: RangeInclusive<u64>, parts: usize) -> Vec<RangeInclusive<u64>> {
    let (start, end) = (*range.start(), *range.end());
    if end < start || parts == 0 {
        return Vec::new();
    }
    let len = u128::from(end - start) + 1;
    let parts = (parts as u128).min(len);
    let base = len / parts;
    let extra = len % parts;

    let mut out = Vec::with_capacity(parts as usize);
    let mut lo = u128::from(start);
    for i in 0..parts {
        let size = base + u128::from(i < extra);
        let hi = lo + size - 1;
        out.push(lo as u64..=hi as u64);
        lo = hi + 1;
    }
    out
}

/// Engine plus the matching f64 reference for one function.
#[derive(Debug, Clone)]
pub enum Evaluator {
    Ln(LnEngine),
    Sqrt(SqrtEngine),
}

impl Evaluator {
    pub fn from_config(config: &SweepConfig) -> Result<Self, SweepError> {
        let format = config.format()?;
        let evaluator = match config.function {
            Function::Ln => Evaluator::Ln(LnEngine::with_table_len(
                format,
                config.iterations,
                config.table_len.max(config.iterations),
            )?),
            Function::Sqrt => Evaluator::Sqrt(SqrtEngine::new(format, config.iterations)?),
        };
        Ok(evaluator)
    }

    pub fn format(&self) -> FixedPointFormat {
        match self {
            Evaluator::Ln(e) => e.format(),
            Evaluator::Sqrt(e) => e.format(),
        }
    }

    /// Gain constant, for the square root only.
    pub fn gain(&self) -> Option<f64> {
        match self {
            Evaluator::Ln(_) => None,
            Evaluator::Sqrt(e) => Some(e.gain().value()),
        }
    }

    /// Evaluate one operand against `ln(s / 2^Fl)` or `sqrt(s)` in f64.
    pub fn evaluate(&self, s: u64) -> Result<ReportRow, SweepError> {
        let row = match self {
            Evaluator::Ln(e) => {
                let reference = (s as f64 / e.format().one() as f64).ln();
                ReportRow::new(s, reference, e.ln_real(s)?)
            }
            Evaluator::Sqrt(e) => ReportRow::new(s, (s as f64).sqrt(), e.sqrt_real(s)?),
        };
        Ok(row)
    }
}

/// Outcome of a sweep: the configuration, merged statistics with flagged
/// rows sorted by operand, and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub config: SweepConfig,
    pub gain: Option<f64>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub stats: ErrorStats,
}

impl SweepReport {
    pub fn fractional_bits(&self) -> u32 {
        self.config.word_length.saturating_sub(1)
    }
}

fn sweep_partition(
    evaluator: &Evaluator,
    index: usize,
    range: RangeInclusive<u64>,
    config: &SweepConfig,
) -> Result<ErrorStats, SweepError> {
    let t0 = Instant::now();
    let (lo, hi) = (*range.start(), *range.end());
    let mut stats = ErrorStats::with_row_limit(config.max_rows);
    for s in range {
        stats.record(evaluator.evaluate(s)?, config.threshold_percent);
    }
    info!(
        partition = index,
        first = lo,
        last = hi,
        flagged = stats.flagged_count(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "partition done"
    );
    Ok(stats)
}

/// Evaluate every operand of `config`'s range, one rayon task per partition,
/// and merge the partial statistics.
///
/// The engines are built once and shared read-only across tasks.
pub fn run_sweep(config: &SweepConfig) -> Result<SweepReport, SweepError> {
    config.validate()?;
    let evaluator = Evaluator::from_config(config)?;
    let started_at = Utc::now();
    let t0 = Instant::now();

    let ranges = partition(config.start..=config.end, config.partitions);
    debug!(partitions = ranges.len(), function = %config.function, "sweep partitioned");

    let partials: Vec<ErrorStats> = ranges
        .into_par_iter()
        .enumerate()
        .map(|(i, range)| sweep_partition(&evaluator, i, range, config))
        .collect::<Result<Vec<_>, SweepError>>()?;

    let mut stats = partials
        .into_iter()
        .fold(ErrorStats::default(), ErrorStats::merge);
    stats.sort_flagged();
    let elapsed = t0.elapsed();

    info!(
        function = %config.function,
        word_length = config.word_length,
        evaluated = stats.evaluated,
        flagged = stats.flagged_count(),
        max_err_percent = stats.max_abs_err_percent,
        elapsed_s = elapsed.as_secs_f64(),
        "sweep complete"
    );

    Ok(SweepReport {
        config: config.clone(),
        gain: evaluator.gain(),
        started_at,
        elapsed,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_covers_range_exactly() {
        let parts = partition(1..=10, 3);
        assert_eq!(parts, vec![1..=4, 5..=7, 8..=10]);

        let parts = partition(5..=6, 8);
        assert_eq!(parts, vec![5..=5, 6..=6]);

        assert_eq!(partition(3..=3, 1), vec![3..=3]);
        assert!(partition(4..=3, 2).is_empty());
        assert!(partition(1..=3, 0).is_empty());
    }

    #[test]
    fn test_partition_of_a_large_word() {
        let end = (1u64 << 40) - 1;
        let parts = partition(1..=end, 7);
        assert_eq!(parts.len(), 7);
        assert_eq!(*parts[0].start(), 1);
        assert_eq!(*parts[6].end(), end);
        for w in parts.windows(2) {
            assert_eq!(*w[0].end() + 1, *w[1].start());
        }
    }

    #[test]
    fn test_small_ln_sweep_counts_every_operand() {
        let config = SweepConfig::new(Function::Ln, 16)
            .with_range(0x8000, 0xFFFF)
            .with_partitions(4);
        let report = run_sweep(&config).unwrap();
        assert_eq!(report.stats.evaluated, 0x8000);
        assert!(report.gain.is_none());
        assert!(report.stats.worst_operand.is_some());
    }

    #[test]
    fn test_sqrt_sweep_reports_gain_and_sorted_rows() {
        let config = SweepConfig::new(Function::Sqrt, 16)
            .with_range(1, 4096)
            .with_threshold(0.0)
            .with_partitions(5);
        let report = run_sweep(&config).unwrap();
        assert_eq!(report.stats.evaluated, 4096);
        let gain = report.gain.unwrap();
        assert!((gain - 1.2075).abs() < 1e-3);
        let ops: Vec<u64> = report.stats.flagged.iter().map(|r| r.operand).collect();
        assert!(ops.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_partition_count_does_not_change_results() {
        let base = SweepConfig::new(Function::Ln, 12).with_threshold(0.0);
        let one = run_sweep(&base.clone().with_partitions(1)).unwrap();
        let many = run_sweep(&base.with_partitions(9)).unwrap();
        assert_eq!(one.stats, many.stats);
    }

    #[test]
    fn test_row_limit_bounds_memory_but_not_counts() {
        let base = SweepConfig::new(Function::Sqrt, 16)
            .with_range(1, 2048)
            .with_threshold(0.0)
            .with_partitions(4);
        let full = run_sweep(&base.clone().with_max_rows(None)).unwrap();
        let capped = run_sweep(&base.with_max_rows(Some(10))).unwrap();

        assert!(full.stats.flagged_count() > 10);
        assert_eq!(capped.stats.flagged_count(), full.stats.flagged_count());
        assert_eq!(capped.stats.flagged.len(), 10);
        assert_eq!(capped.stats.flagged[..], full.stats.flagged[..10]);
        assert_eq!(capped.stats.worst_operand, full.stats.worst_operand);
    }

    #[test]
    fn test_ln_sweep_past_the_word_bound_is_rejected() {
        let wide = SweepConfig::new(Function::Ln, 60).with_range(1, 4);
        assert!(matches!(
            run_sweep(&wide),
            Err(SweepError::Engine(cordic_math::CordicError::LnWordLengthTooLarge(60)))
        ));
    }

    #[test]
    fn test_invalid_sweeps_fail_before_running() {
        let odd = SweepConfig::new(Function::Sqrt, 15);
        assert!(matches!(run_sweep(&odd), Err(SweepError::Engine(_))));
        let zero = SweepConfig::new(Function::Sqrt, 16).with_range(0, 3);
        assert!(matches!(run_sweep(&zero), Err(SweepError::ZeroStart)));
    }
}
