use cordic_math::{FixedPointFormat, MAX_ITERATIONS};
use serde::{Deserialize, Serialize};

use crate::SweepError;

/// Flagged rows kept for the report unless the caller picks another limit.
pub const DEFAULT_MAX_ROWS: usize = 1_000_000;

/// Which engine a sweep exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    Ln,
    Sqrt,
}

impl Function {
    /// Column prefix used in the report header (`ln_ref`, `sqrt_cordic`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Function::Ln => "ln",
            Function::Sqrt => "sqrt",
        }
    }

    /// Percent error above which a row is written to the report.
    pub fn default_threshold(self) -> f64 {
        match self {
            Function::Ln => 0.1,
            Function::Sqrt => 1.0,
        }
    }

    /// Word length used when the caller does not pick one.
    pub fn default_word_length(self) -> u32 {
        match self {
            Function::Ln => 30,
            Function::Sqrt => 32,
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One sweep over an inclusive operand range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub function: Function,
    pub word_length: u32,
    pub iterations: u32,
    /// Length of the atanh table built for the logarithm (>= `iterations`).
    pub table_len: u32,
    pub start: u64,
    pub end: u64,
    pub threshold_percent: f64,
    /// Number of contiguous partitions evaluated in parallel.
    pub partitions: usize,
    /// Cap on flagged rows held for the report; `None` keeps all of them.
    #[serde(default)]
    pub max_rows: Option<usize>,
}

impl SweepConfig {
    /// Full-word sweep `[1, 2^Wl - 1]` with `Wl` iterations.
    pub fn new(function: Function, word_length: u32) -> Self {
        let end = if word_length >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << word_length).saturating_sub(1)
        };
        Self {
            function,
            word_length,
            iterations: word_length,
            table_len: MAX_ITERATIONS,
            start: 1,
            end,
            threshold_percent: function.default_threshold(),
            partitions: rayon::current_num_threads().max(1),
            max_rows: Some(DEFAULT_MAX_ROWS),
        }
    }

    pub fn with_range(mut self, start: u64, end: u64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_threshold(mut self, threshold_percent: f64) -> Self {
        self.threshold_percent = threshold_percent;
        self
    }

    pub fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn format(&self) -> Result<FixedPointFormat, SweepError> {
        Ok(FixedPointFormat::new(self.word_length)?)
    }

    /// Number of operands in the range.
    pub fn len(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks everything that does not need an engine.
    pub fn validate(&self) -> Result<FixedPointFormat, SweepError> {
        let format = self.format()?;
        if self.start == 0 {
            return Err(SweepError::ZeroStart);
        }
        if self.end < self.start {
            return Err(SweepError::EmptyRange {
                start: self.start,
                end: self.end,
            });
        }
        if !format.fits(self.end) {
            return Err(SweepError::RangeTooWide {
                end: self.end,
                width: self.word_length,
            });
        }
        if self.partitions == 0 {
            return Err(SweepError::NoPartitions);
        }
        if !(self.threshold_percent.is_finite() && self.threshold_percent >= 0.0) {
            return Err(SweepError::InvalidThreshold(self.threshold_percent));
        }
        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_the_whole_word() {
        let c = SweepConfig::new(Function::Ln, 16);
        assert_eq!((c.start, c.end), (1, 0xFFFF));
        assert_eq!(c.iterations, 16);
        assert_eq!(c.table_len, 72);
        assert_eq!(c.max_rows, Some(DEFAULT_MAX_ROWS));
        assert_eq!(c.threshold_percent, 0.1);
        assert_eq!(c.len(), 0xFFFF);
        assert!(c.validate().is_ok());

        let c = SweepConfig::new(Function::Sqrt, 16);
        assert_eq!(c.threshold_percent, 1.0);
    }

    #[test]
    fn test_validation_errors() {
        let base = SweepConfig::new(Function::Ln, 16);
        assert!(matches!(
            base.clone().with_range(0, 10).validate(),
            Err(SweepError::ZeroStart)
        ));
        assert!(matches!(
            base.clone().with_range(10, 9).validate(),
            Err(SweepError::EmptyRange { start: 10, end: 9 })
        ));
        assert!(matches!(
            base.clone().with_range(1, 0x1_0000).validate(),
            Err(SweepError::RangeTooWide { end: 0x1_0000, width: 16 })
        ));
        assert!(matches!(
            base.clone().with_partitions(0).validate(),
            Err(SweepError::NoPartitions)
        ));
        assert!(matches!(
            base.with_threshold(f64::NAN).validate(),
            Err(SweepError::InvalidThreshold(_))
        ));
        assert!(matches!(
            SweepConfig::new(Function::Ln, 70).validate(),
            Err(SweepError::Engine(_))
        ));
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let c = SweepConfig::new(Function::Sqrt, 24).with_range(5, 500);
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"function\":\"sqrt\""));
        let back: SweepConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
