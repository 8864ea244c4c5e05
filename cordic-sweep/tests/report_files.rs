use cordic_sweep::{run_sweep, save_report, save_summary_json, Function, SweepConfig, SweepSummary};
use std::fs;

#[test]
fn ln_report_lists_flagged_rows_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("error_values.txt");

    let config = SweepConfig::new(Function::Ln, 14).with_partitions(6);
    let report = run_sweep(&config).unwrap();
    save_report(&path, &report).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("First value=1\n"));
    assert!(text.contains("Last value=16383\n"));
    assert!(text.contains("Wl=14\nFl=13\n"));

    let header = text.lines().position(|l| l == "s,ln_ref,ln_cordic,err_perc").unwrap();
    let operands: Vec<u64> = text
        .lines()
        .skip(header + 1)
        .take_while(|l| !l.is_empty())
        .map(|l| l.split(',').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(operands.len() as u64, report.stats.flagged_count());
    assert!(operands.windows(2).all(|w| w[0] < w[1]));
    assert!(text.contains(&format!("Number of errors={}\n", operands.len())));
    assert!(text.contains("Evaluated=16383\n"));
}

#[test]
fn sqrt_sweep_stays_under_one_percent() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("sqrt.txt");
    let json_path = dir.path().join("sqrt.json");

    let config = SweepConfig::new(Function::Sqrt, 20).with_range(1, 1 << 16);
    let report = run_sweep(&config).unwrap();
    save_report(&report_path, &report).unwrap();
    save_summary_json(&json_path, &report).unwrap();

    assert_eq!(report.stats.flagged_count(), 0);
    let text = fs::read_to_string(&report_path).unwrap();
    assert!(text.contains("cordicGain=1.207"));
    assert!(text.contains("Number of errors=0\n"));

    let summary: SweepSummary =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(summary.function, "sqrt");
    assert_eq!(summary.evaluated, 1 << 16);
    assert_eq!(summary.flagged, 0);
    assert!(summary.max_abs_err_percent < 1.0);
}

#[test]
fn single_operand_sweep() {
    let config = SweepConfig::new(Function::Ln, 24)
        .with_range(0x80_0000, 0x80_0000)
        .with_threshold(0.0);
    let report = run_sweep(&config).unwrap();
    assert_eq!(report.stats.evaluated, 1);
    assert_eq!(report.stats.worst_operand, Some(0x80_0000));
    // ln(1): reference zero, absolute error stands in.
    assert!(report.stats.max_abs_err_percent < 1e-3);
}
