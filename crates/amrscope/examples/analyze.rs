//! Example: classify an isolate table and test the MDR / carbapenem
//! association with the library API.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>

use std::env;
use std::path::Path;

use amrscope::AmrScope;

fn main() -> amrscope::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("amrscope: {}", path.display());
    println!("{}", separator);
    println!();

    let report = AmrScope::new().run(path)?;

    if let Some(source) = &report.source {
        println!("## Source");
        println!("  File: {}", source.file);
        println!("  Format: {}", source.format);
        println!("  Isolates: {}", source.row_count);
        println!("  Hash: {}", source.hash);
        println!();
    }

    println!("## Category prevalence");
    for row in &report.category_prevalence {
        println!("  {:35} {:>6} ({:.1}%)", row.category, row.resistant, row.percentage);
    }
    println!();

    println!("## Most common resistance patterns");
    for pattern in report.resistance_patterns.iter().take(10) {
        println!("  {:>6}  {:?}", pattern.count, pattern.categories);
    }
    println!();

    if let Some(association) = &report.association {
        println!("## Association");
        println!("  Table: {}", association.table);
        println!("  Exact test p-value: {:.4e}", association.exact_test.p_value);

        let or = &association.odds_ratio;
        println!(
            "  Odds ratio: {:.3} [{:.3}, {:.3}] {} ({})",
            or.estimate,
            or.ci_lower,
            or.ci_upper,
            or.significance,
            or.method.label()
        );
    }

    Ok(())
}
