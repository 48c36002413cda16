//! Fuzz target for interpretation-code decoding.

#![no_main]

use amrscope::classify::{decode_cell, Interpretation};
use amrscope::{DataTable, InterpretationPolicy};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    raw: String,
    lenient: bool,
    row: u16,
}

fuzz_target!(|input: Input| {
    let policy = if input.lenient {
        InterpretationPolicy::TreatAsMissing
    } else {
        InterpretationPolicy::Reject
    };

    let decoded = decode_cell(&input.raw, policy, input.row as usize, "drug");
    let parsed = Interpretation::from_code(&input.raw);

    match decoded {
        Ok(Some(interp)) => assert_eq!(Some(interp), parsed),
        Ok(None) => assert!(
            DataTable::is_null_value(&input.raw) || (input.lenient && parsed.is_none())
        ),
        Err(_) => assert!(!input.lenient && parsed.is_none()),
    }
});
