use cordic_math::{FixedPointFormat, LnEngine, SqrtEngine};

fn main() {
    let format = FixedPointFormat::new(32).expect("valid word length");
    let ln = LnEngine::with_table_len(format, 32, 72).expect("ln engine");
    let sqrt = SqrtEngine::new(format, 32).expect("sqrt engine");

    let mut bytes = Vec::new();
    for v in ln.table().as_slice() { bytes.extend_from_slice(&v.to_le_bytes()); }
    println!("ATANH_Q31_HASH {}", sha256(&bytes));

    let operands: Vec<u64> = (0..4096u64).map(|i| 1 + i * 1_048_573).collect();
    let mut bytes = Vec::with_capacity(operands.len() * 16);
    for &s in &operands {
        bytes.extend_from_slice(&ln.ln(s).expect("ln").to_le_bytes());
        bytes.extend_from_slice(&sqrt.sqrt(s).expect("sqrt").to_le_bytes());
    }
    println!("CORDIC_Q31_HASH {}", sha256(&bytes));
}

fn sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    let out = hasher.finalize();
    hex::encode(out)
}
