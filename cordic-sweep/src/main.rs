use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cordic_sweep::{
    run_sweep, save_report, save_summary_json, write_atanh_listing, Function, SweepConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Accuracy sweeps for the hyperbolic CORDIC engines")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep the natural logarithm over UQ1.Fl operands
    Ln(SweepArgs),
    /// Sweep the square root over integer operands
    Sqrt(SweepArgs),
    /// Print atanh(2^-j) for j = 0..count
    AtanhTable {
        #[arg(long, default_value_t = 64)]
        count: u32,
    },
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Word length Wl (default: 30 for ln, 32 for sqrt)
    #[arg(long)]
    word_length: Option<u32>,

    /// Iteration count (default: Wl)
    #[arg(long)]
    iterations: Option<u32>,

    /// Atanh table length for ln (>= iterations)
    #[arg(long, default_value_t = cordic_math::MAX_ITERATIONS)]
    table_len: u32,

    /// First raw operand (default: 1)
    #[arg(long)]
    start: Option<u64>,

    /// Last raw operand, inclusive (default: 2^Wl - 1)
    #[arg(long)]
    end: Option<u64>,

    /// Evaluate a single real value (UQ1.Fl for ln, rounded integer for sqrt)
    #[arg(long, conflicts_with_all = ["start", "end"])]
    value: Option<f64>,

    /// Percent error above which a row is reported
    #[arg(long)]
    threshold: Option<f64>,

    /// Number of parallel partitions (default: rayon thread count)
    #[arg(long)]
    workers: Option<usize>,

    /// Cap on flagged rows kept for the report
    #[arg(long, default_value_t = cordic_sweep::DEFAULT_MAX_ROWS)]
    max_rows: usize,

    /// Error report path
    #[arg(long, default_value = "error_values.txt")]
    output: PathBuf,

    /// Also write a JSON summary here
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn build_config(function: Function, args: &SweepArgs) -> Result<SweepConfig> {
    let wl = args.word_length.unwrap_or(function.default_word_length());
    let mut config = SweepConfig::new(function, wl);
    config.table_len = args.table_len;
    config = config.with_max_rows(Some(args.max_rows));
    if let Some(n) = args.iterations {
        config = config.with_iterations(n);
    }
    if let Some(t) = args.threshold {
        config = config.with_threshold(t);
    }
    if let Some(w) = args.workers {
        config = config.with_partitions(w);
    }

    let (start, end) = match args.value {
        Some(v) => {
            let s = match function {
                Function::Ln => config.format().context("invalid word length")?.encode(v),
                Function::Sqrt => {
                    anyhow::ensure!(v.is_finite() && v >= 0.0, "sqrt value must be non-negative");
                    v.round() as u64
                }
            };
            (s, s)
        }
        None => (
            args.start.unwrap_or(config.start),
            args.end.unwrap_or(config.end),
        ),
    };
    Ok(config.with_range(start, end))
}

fn sweep(function: Function, args: &SweepArgs) -> Result<()> {
    let config = build_config(function, args)?;
    config.validate().context("invalid sweep configuration")?;

    println!(
        "Sweeping {} over [{}, {}] (Wl={}, {} iterations, {} partitions)",
        function,
        config.start,
        config.end,
        config.word_length,
        config.iterations,
        config.partitions
    );

    let report = run_sweep(&config).context("sweep failed")?;
    save_report(&args.output, &report)
        .with_context(|| format!("write report {}", args.output.display()))?;
    if let Some(path) = args.summary_json.as_ref() {
        save_summary_json(path, &report)
            .with_context(|| format!("write summary {}", path.display()))?;
    }

    println!("Evaluated:      {}", report.stats.evaluated);
    println!(
        "Flagged:        {} (> {}%)",
        report.stats.flagged_count(),
        config.threshold_percent
    );
    if let Some(s) = report.stats.worst_operand {
        println!(
            "Max error:      {:.6e}% at s={}",
            report.stats.max_abs_err_percent, s
        );
    }
    if let Some(gain) = report.gain {
        println!("Gain:           {:.12}", gain);
    }
    if report.stats.rows_truncated() {
        println!(
            "Rows written:   {} (--max-rows reached)",
            report.stats.flagged.len()
        );
    }
    println!("Elapsed:        {:.3}s", report.elapsed.as_secs_f64());
    println!("✓ Report written to {}", args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Ln(args) => sweep(Function::Ln, args),
        Command::Sqrt(args) => sweep(Function::Sqrt, args),
        Command::AtanhTable { count } => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_atanh_listing(&mut out, *count).context("write atanh listing")?;
            out.flush().context("flush stdout")?;
            Ok(())
        }
    }
}
