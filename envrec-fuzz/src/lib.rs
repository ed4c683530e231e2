//! Fuzzing entry points for the envrec-core decoding surface
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_reader

pub fn fuzz_reader(data: &[u8]) {
    use envrec_core::reader::scan_stream;

    // Reading arbitrary bytes must never panic
    let _ = scan_stream(data);
}

pub fn fuzz_decode_envelope(data: &[u8]) {
    use envrec_core::decode_envelope;

    // Decoding arbitrary bytes must never panic
    let _ = decode_envelope(data);
}
