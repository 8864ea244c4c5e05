//! Plain-text error report, JSON summary and the atanh constant listing.
//!
//! Report layout:
//! ```text
//! Run started=<rfc3339>
//! First value=<start>
//! Last value=<end>
//! Number of iterations=<n>
//! Wl=<word length>
//! Fl=<fractional bits>
//! cordicGain=<gain>            (square root only)
//!
//! Errors table
//! s,<fn>_ref,<fn>_cordic,err_perc
//! <one row per flagged operand, ascending>
//!
//! Number of errors=<count>
//! Rows written=<count> (row limit reached)   (only when rows were capped)
//! Evaluated=<count>
//! Max Error=<percent>% at s=<operand>
//! Elapsed seconds=<seconds>
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sweep::SweepReport;
use crate::SweepError;

pub fn write_report<W: Write>(out: &mut W, report: &SweepReport) -> io::Result<()> {
    let config = &report.config;
    let name = config.function.name();

    writeln!(out, "Run started={}", report.started_at.to_rfc3339())?;
    writeln!(out, "First value={}", config.start)?;
    writeln!(out, "Last value={}", config.end)?;
    writeln!(out, "Number of iterations={}", config.iterations)?;
    writeln!(out, "Wl={}", config.word_length)?;
    writeln!(out, "Fl={}", report.fractional_bits())?;
    if let Some(gain) = report.gain {
        writeln!(out, "cordicGain={:.12}", gain)?;
    }
    writeln!(out)?;
    writeln!(out, "Errors table")?;
    writeln!(out, "s,{name}_ref,{name}_cordic,err_perc")?;
    for row in &report.stats.flagged {
        writeln!(
            out,
            "{},{:+.8e},{:+.8e},{:+.8e}%",
            row.operand, row.reference, row.cordic, row.err_percent
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Number of errors={}", report.stats.flagged_count())?;
    if report.stats.rows_truncated() {
        writeln!(out, "Rows written={} (row limit reached)", report.stats.flagged.len())?;
    }
    writeln!(out, "Evaluated={}", report.stats.evaluated)?;
    match report.stats.worst_operand {
        Some(s) => writeln!(
            out,
            "Max Error={:.8e}% at s={}",
            report.stats.max_abs_err_percent, s
        )?,
        None => writeln!(out, "Max Error=n/a")?,
    }
    writeln!(out, "Elapsed seconds={:.3}", report.elapsed.as_secs_f64())?;
    Ok(())
}

/// Write the report to `path`, replacing any existing file.
pub fn save_report(path: &Path, report: &SweepReport) -> Result<(), SweepError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_report(&mut out, report)?;
    out.flush()?;
    Ok(())
}

/// Machine-readable digest of a sweep (no per-row data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub function: String,
    pub word_length: u32,
    pub fractional_bits: u32,
    pub iterations: u32,
    pub first: u64,
    pub last: u64,
    pub threshold_percent: f64,
    pub gain: Option<f64>,
    pub evaluated: u64,
    pub flagged: u64,
    pub rows_written: usize,
    pub max_abs_err_percent: f64,
    pub worst_operand: Option<u64>,
    pub started_at: String,
    pub elapsed_seconds: f64,
}

impl SweepSummary {
    pub fn from_report(report: &SweepReport) -> Self {
        let c = &report.config;
        Self {
            function: c.function.name().to_string(),
            word_length: c.word_length,
            fractional_bits: report.fractional_bits(),
            iterations: c.iterations,
            first: c.start,
            last: c.end,
            threshold_percent: c.threshold_percent,
            gain: report.gain,
            evaluated: report.stats.evaluated,
            flagged: report.stats.flagged_count(),
            rows_written: report.stats.flagged.len(),
            max_abs_err_percent: report.stats.max_abs_err_percent,
            worst_operand: report.stats.worst_operand,
            started_at: report.started_at.to_rfc3339(),
            elapsed_seconds: report.elapsed.as_secs_f64(),
        }
    }
}

pub fn save_summary_json(path: &Path, report: &SweepReport) -> Result<(), SweepError> {
    let summary = SweepSummary::from_report(report);
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, &summary)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// `atanh(2^-j)` for `j = 0..count` in f64; `j = 0` is `+inf`.
pub fn atanh_constants(count: u32) -> Vec<f64> {
    (0..count)
        .map(|j| (-f64::from(j)).exp2().atanh())
        .collect()
}

pub fn write_atanh_listing<W: Write>(out: &mut W, count: u32) -> io::Result<()> {
    for (j, v) in atanh_constants(count).into_iter().enumerate() {
        writeln!(out, "{:2} {:.20e}", j, v)?;
    }
    Ok(())
}
