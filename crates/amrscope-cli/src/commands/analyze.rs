//! Analyze command - classify isolates and test the association.

use std::path::PathBuf;

use amrscope::export;
use amrscope::stats::OddsRatioMethod;
use colored::Colorize;
use tracing::debug;

use super::{build_scope, export_dir, file_stem};
use crate::cli::InputArgs;

pub fn run(
    input: InputArgs,
    output: Option<PathBuf>,
    confidence: f64,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let scope = build_scope(&input, confidence)?;

    let (table, source) = scope.load(&input.file)?;
    let report = scope.run_table(&table, Some(source))?;

    let output_dir = export_dir(&input.file, output);
    let written = export::write_all(&output_dir, &file_stem(&input.file), &table, &report)?;
    for path in &written {
        debug!(path = %path.display(), "wrote export");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Analyzed".cyan().bold(),
        input.file.display().to_string().white()
    );
    if let Some(source) = &report.source {
        println!(
            "  {} isolates, {} columns ({})",
            source.row_count, source.column_count, source.format
        );
    }
    println!();

    let collection = &report.collection;
    println!(
        "MDR: {} of {} isolates, carbapenem-resistant: {}",
        collection.mdr_count().to_string().white().bold(),
        collection.len(),
        collection.carbapenem_resistant_count().to_string().white().bold()
    );

    if verbose {
        println!();
        println!("{}", "Category prevalence:".yellow().bold());
        for row in &report.category_prevalence {
            println!(
                "  {:35} {:>6} ({:.1}%)",
                row.category, row.resistant, row.percentage
            );
        }
        println!();
        println!("{}", "Resistance patterns:".yellow().bold());
        for pattern in &report.resistance_patterns {
            let label = if pattern.categories.is_empty() {
                "none".to_string()
            } else {
                pattern.categories.join(" & ")
            };
            println!("  {:>6}  {}", pattern.count, label);
        }
    }

    if let Some(association) = &report.association {
        println!();
        println!("{}", "Carbapenem status x MDR phenotype:".yellow().bold());
        for row in &association.proportions {
            println!(
                "  {:12} {:8} {:>6} ({:.1}%)",
                row.carbapenem_status.label(),
                row.mdr_phenotype.label(),
                row.count,
                row.percentage
            );
        }

        let or = &association.odds_ratio;
        let significance = if or.p_value < amrscope::stats::SIGNIFICANCE_THRESHOLD {
            or.significance.green().bold()
        } else {
            or.significance.normal()
        };
        println!();
        println!(
            "Odds ratio: {:.3} ({:.0}% CI {:.3} - {:.3}), p = {:.4e} [{}]",
            or.estimate,
            or.confidence_level * 100.0,
            or.ci_lower,
            or.ci_upper,
            or.p_value,
            significance
        );
        if or.method == OddsRatioMethod::HaldaneAnscombe {
            println!(
                "  {}",
                "zero cell in table: Haldane-Anscombe corrected estimate".yellow()
            );
        }
    }

    println!();
    println!("{}", "Wrote:".green().bold());
    for path in written {
        println!("  {}", path.display().to_string().white());
    }

    Ok(())
}
