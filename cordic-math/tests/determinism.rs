use cordic_math::{
    build_atanh_table, compute_ln, compute_sqrt, estimate_sqrt_gain, AtanhTable, FixedPointFormat,
    LnEngine, SqrtEngine,
};

// Bit-exact expectations for fixed configurations. Iteration counts stay
// below Wl for the logarithm so no table entry sits on a rounding tie.

#[test]
fn test_atanh_table_q15() {
    let f = FixedPointFormat::new(16).unwrap();
    let table = build_atanh_table(f, 12).unwrap();
    let expected: Vec<i64> = vec![18000, 8369, 4118, 2051, 1024, 512, 256, 128, 64, 32, 16, 8];
    assert_eq!(table.as_slice(), expected.as_slice(), "Q1.15 atanh table mismatch");
}

#[test]
fn test_atanh_table_is_reproducible() {
    for wl in [16, 24, 30, 32, 40] {
        let f = FixedPointFormat::new(wl).unwrap();
        let a = AtanhTable::build(f, 72).unwrap();
        let b = AtanhTable::build(f, 72).unwrap();
        assert_eq!(a, b, "Wl={} table differs between builds", wl);
    }
}

#[test]
fn test_ln_q15_exact() {
    let f = FixedPointFormat::new(16).unwrap();
    let table = build_atanh_table(f, 12).unwrap();
    let ln2 = f.ln2();
    assert_eq!(ln2, 22713);

    let cases: [(u64, i64); 5] = [
        (0x0001, -340_705),
        (0x4000, -22_723),
        (0x8000, -10),
        (0xC000, 13_282),
        (0xFFFF, 22_702),
    ];
    for (s, expected) in cases {
        let got = compute_ln(s, f, 12, &table, ln2).unwrap();
        assert_eq!(got, expected, "ln({:#06x})", s);
    }
}

#[test]
fn test_ln_q31_exact() {
    let f = FixedPointFormat::new(32).unwrap();
    let engine = LnEngine::new(f, 24).unwrap();
    assert_eq!(engine.ln(0x0000_0001), Ok(-46_144_189_364));
    assert_eq!(engine.ln(0x5A82_7999), Ok(-744_261_332));
    assert_eq!(engine.ln(0xFFFF_FFFF), Ok(1_488_522_376));
}

#[test]
fn test_sqrt_exact() {
    let f = FixedPointFormat::new(16).unwrap();
    let gain = estimate_sqrt_gain(16).unwrap();
    assert_eq!(gain.to_fixed(f), 310);

    let cases: [(u64, u64); 6] = [
        (1, 65_410),
        (2, 92_690),
        (4, 131_130),
        (9, 197_160),
        (0x4000, 8_411_850),
        (0xFFFF, 16_824_010),
    ];
    for (s, expected) in cases {
        assert_eq!(compute_sqrt(s, f, 16, &gain), Ok(expected), "sqrt({})", s);
    }

    let wide = FixedPointFormat::new(32).unwrap();
    assert_eq!(estimate_sqrt_gain(32).unwrap().to_fixed(wide), 79_135);
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let f = FixedPointFormat::new(30).unwrap();
    let ln = LnEngine::with_table_len(f, 30, 72).unwrap();
    let first: Vec<_> = (1..2000u64).map(|s| ln.ln(s * 517)).collect();
    let second: Vec<_> = (1..2000u64).map(|s| ln.ln(s * 517)).collect();
    assert_eq!(first, second);

    let f = FixedPointFormat::new(32).unwrap();
    let sq = SqrtEngine::new(f, 32).unwrap();
    let first: Vec<_> = (1..2000u64).map(|s| sq.sqrt(s * 2_000_003)).collect();
    let second: Vec<_> = (1..2000u64).map(|s| sq.sqrt(s * 2_000_003)).collect();
    assert_eq!(first, second);
}
