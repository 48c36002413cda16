//! Fuzz target for parsing and classifying arbitrary tables.
//!
//! Parsing may fail, and classification may reject the schema or a code,
//! but neither may panic.

#![no_main]

use amrscope::{AmrScope, IngestConfig, InterpretationPolicy, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(table) = Parser::new().parse_bytes(data) else {
        return;
    };

    let strict = AmrScope::new();
    let _ = strict.run_table(&table, None);

    let lenient = AmrScope::new().with_ingest(IngestConfig {
        id_column: None,
        policy: InterpretationPolicy::TreatAsMissing,
    });
    if let Ok(collection) = lenient.classify(&table) {
        assert_eq!(collection.len(), table.row_count());
    }
});
