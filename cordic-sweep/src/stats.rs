use serde::{Deserialize, Serialize};

/// One evaluated operand: the f64 reference, the CORDIC result and the
/// relative error between them in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub operand: u64,
    pub reference: f64,
    pub cordic: f64,
    pub err_percent: f64,
}

impl ReportRow {
    pub fn new(operand: u64, reference: f64, cordic: f64) -> Self {
        Self {
            operand,
            reference,
            cordic,
            err_percent: error_percent(reference, cordic),
        }
    }
}

/// `(reference - cordic) / reference * 100`.
///
/// A zero reference (`ln(1)`) has no relative error; the absolute error,
/// scaled by 100, stands in for it.
pub fn error_percent(reference: f64, cordic: f64) -> f64 {
    let diff = reference - cordic;
    if reference == 0.0 {
        diff * 100.0
    } else {
        diff / reference * 100.0
    }
}

/// Error accumulator for one partition; partitions merge into the total.
///
/// With a row limit, only the `limit` smallest flagged operands keep their
/// rows; `flagged_total` still counts every flagged operand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorStats {
    pub evaluated: u64,
    /// Largest `|err_percent|` over every evaluated operand.
    pub max_abs_err_percent: f64,
    pub worst_operand: Option<u64>,
    pub flagged_total: u64,
    /// Rows whose `|err_percent|` exceeded the threshold, up to `row_limit`.
    pub flagged: Vec<ReportRow>,
    pub row_limit: Option<usize>,
}

impl ErrorStats {
    pub fn with_row_limit(row_limit: Option<usize>) -> Self {
        Self {
            row_limit,
            ..Self::default()
        }
    }

    /// Operands must arrive in ascending order for the row limit to keep
    /// the smallest ones.
    pub fn record(&mut self, row: ReportRow, threshold_percent: f64) {
        self.evaluated += 1;
        let abs = row.err_percent.abs();
        if self.worst_operand.is_none() || abs > self.max_abs_err_percent {
            self.max_abs_err_percent = abs;
            self.worst_operand = Some(row.operand);
        }
        if abs > threshold_percent {
            self.flagged_total += 1;
            if self.row_limit.map_or(true, |limit| self.flagged.len() < limit) {
                self.flagged.push(row);
            }
        }
    }

    /// Combine two accumulators. Ties on the maximum keep the smaller operand
    /// so the result does not depend on partition order.
    pub fn merge(mut self, other: ErrorStats) -> ErrorStats {
        self.evaluated += other.evaluated;
        match (self.worst_operand, other.worst_operand) {
            (_, None) => {}
            (None, Some(_)) => {
                self.max_abs_err_percent = other.max_abs_err_percent;
                self.worst_operand = other.worst_operand;
            }
            (Some(a), Some(b)) => {
                let take_other = other.max_abs_err_percent > self.max_abs_err_percent
                    || (other.max_abs_err_percent == self.max_abs_err_percent && b < a);
                if take_other {
                    self.max_abs_err_percent = other.max_abs_err_percent;
                    self.worst_operand = other.worst_operand;
                }
            }
        }
        self.flagged_total += other.flagged_total;
        self.flagged.extend(other.flagged);
        self.row_limit = match (self.row_limit, other.row_limit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if let Some(limit) = self.row_limit {
            if self.flagged.len() > limit {
                self.sort_flagged();
                self.flagged.truncate(limit);
            }
        }
        self
    }

    /// Every flagged operand, including those past the row limit.
    pub fn flagged_count(&self) -> u64 {
        self.flagged_total
    }

    /// True when the row limit dropped some flagged rows.
    pub fn rows_truncated(&self) -> bool {
        (self.flagged.len() as u64) < self.flagged_total
    }

    pub fn sort_flagged(&mut self) {
        self.flagged.sort_by_key(|row| row.operand);
    }
}
