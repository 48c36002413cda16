//! Classify command - label isolates without the association analysis.

use std::path::PathBuf;

use amrscope::{export, CarbapenemStatus, MdrPhenotype};
use colored::Colorize;
use tracing::debug;

use super::{build_scope, file_stem};
use crate::cli::InputArgs;

pub fn run(
    input: InputArgs,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let scope = build_scope(&input, amrscope::AnalyzerConfig::default().confidence_level)?;

    let (table, source) = scope.load(&input.file)?;
    let report = scope.classify_report(&table, Some(source))?;

    let output_path = output.unwrap_or_else(|| {
        let ext = if table.delimiter == b'\t' { "tsv" } else { "csv" };
        let mut p = input.file.clone();
        p.set_file_name(format!("{}_classified.{}", file_stem(&input.file), ext));
        p
    });
    export::write_augmented_table(&table, &report.collection, &output_path, table.delimiter)?;
    debug!(
        path = %output_path.display(),
        isolates = report.collection.len(),
        "wrote augmented table"
    );

    println!(
        "{} {} isolates from {}",
        "Classified".cyan().bold(),
        report.collection.len().to_string().white().bold(),
        input.file.display().to_string().white()
    );

    if verbose {
        println!();
        for isolate in &report.collection.isolates {
            let c = &isolate.classification;
            let phenotype = match c.mdr_phenotype {
                MdrPhenotype::Mdr => c.mdr_phenotype.label().red(),
                MdrPhenotype::NonMdr => c.mdr_phenotype.label().normal(),
            };
            let status = match c.carbapenem_status {
                CarbapenemStatus::Resistant => c.carbapenem_status.label().red(),
                CarbapenemStatus::Susceptible => c.carbapenem_status.label().normal(),
            };
            println!(
                "  {:20} {:>2} categories  {:8} {}",
                isolate.id, c.resistant_categories, phenotype, status
            );
        }
    }

    println!();
    println!(
        "MDR: {}, carbapenem-resistant: {}",
        report.collection.mdr_count().to_string().white().bold(),
        report
            .collection
            .carbapenem_resistant_count()
            .to_string()
            .white()
            .bold()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
