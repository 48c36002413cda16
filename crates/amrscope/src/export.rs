//! Flat tabular exports for downstream tools.
//!
//! Every writer takes its destination explicitly; nothing here remembers an
//! output directory between calls.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::classify::{CategoryPrevalence, ClassifiedCollection, ResistancePattern};
use crate::error::{AmrError, Result};
use crate::input::DataTable;
use crate::report::Report;
use crate::stats::{OddsRatioRecord, ProportionRow};

/// Column appended to the augmented table for the MDR label.
pub const MDR_PHENOTYPE_COLUMN: &str = "mdr_phenotype";
/// Column appended to the augmented table for the carbapenem label.
pub const CARBAPENEM_STATUS_COLUMN: &str = "carbapenem_status";

/// Separator between category names in the pattern table.
const PATTERN_SEPARATOR: &str = " & ";

fn create_writer(path: &Path, delimiter: u8) -> Result<csv::Writer<BufWriter<File>>> {
    let file = File::create(path).map_err(|e| AmrError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(BufWriter::new(file)))
}

fn finish(mut writer: csv::Writer<BufWriter<File>>, path: &Path) -> Result<()> {
    writer.flush().map_err(|e| AmrError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the input table with the two derived columns appended.
///
/// `collection` must come from classifying `table`, row for row.
pub fn write_augmented_table(
    table: &DataTable,
    collection: &ClassifiedCollection,
    path: impl AsRef<Path>,
    delimiter: u8,
) -> Result<()> {
    let path = path.as_ref();
    if table.row_count() != collection.len() {
        return Err(AmrError::Persistence(format!(
            "table has {} rows but {} isolates were classified",
            table.row_count(),
            collection.len()
        )));
    }

    let mut writer = create_writer(path, delimiter)?;

    let mut header: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    header.extend([MDR_PHENOTYPE_COLUMN, CARBAPENEM_STATUS_COLUMN]);
    writer.write_record(&header)?;

    for (row, isolate) in table.rows.iter().zip(&collection.isolates) {
        let c = &isolate.classification;
        let mut record: Vec<&str> = row.iter().map(String::as_str).collect();
        record.extend([c.mdr_phenotype.label(), c.carbapenem_status.label()]);
        writer.write_record(&record)?;
    }

    finish(writer, path)
}

/// Write the carbapenem status × MDR phenotype proportion table.
pub fn write_proportions(rows: &[ProportionRow], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path, b',')?;

    writer.write_record(["carbapenem_status", "mdr_phenotype", "count", "percentage"])?;
    for row in rows {
        writer.write_record([
            row.carbapenem_status.label().to_string(),
            row.mdr_phenotype.label().to_string(),
            row.count.to_string(),
            format!("{:.2}", row.percentage),
        ])?;
    }

    finish(writer, path)
}

/// Write the single-row odds-ratio record.
pub fn write_odds_ratio(record: &OddsRatioRecord, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path, b',')?;

    writer.write_record([
        "odds_ratio",
        "ci_lower",
        "ci_upper",
        "confidence_level",
        "p_value",
        "significance",
        "method",
    ])?;
    writer.write_record([
        record.estimate.to_string(),
        record.ci_lower.to_string(),
        record.ci_upper.to_string(),
        record.confidence_level.to_string(),
        record.p_value.to_string(),
        record.significance.clone(),
        record.method.label().to_string(),
    ])?;

    finish(writer, path)
}

/// Write resistant-isolate counts per category.
pub fn write_category_prevalence(rows: &[CategoryPrevalence], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path, b',')?;

    writer.write_record(["category", "resistant", "percentage"])?;
    for row in rows {
        writer.write_record([
            row.category.clone(),
            row.resistant.to_string(),
            format!("{:.2}", row.percentage),
        ])?;
    }

    finish(writer, path)
}

/// Write resistant-category combinations and their isolate counts.
pub fn write_resistance_patterns(rows: &[ResistancePattern], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_writer(path, b',')?;

    writer.write_record(["categories", "category_count", "isolates"])?;
    for row in rows {
        let label = if row.categories.is_empty() {
            "none".to_string()
        } else {
            row.categories.join(PATTERN_SEPARATOR)
        };
        writer.write_record([
            label,
            row.categories.len().to_string(),
            row.count.to_string(),
        ])?;
    }

    finish(writer, path)
}

/// Write every export of a report into `dir`, file names prefixed by `stem`.
///
/// Returns the paths written. The association tables are skipped when the
/// report has no association result.
pub fn write_all(
    dir: impl AsRef<Path>,
    stem: &str,
    table: &DataTable,
    report: &Report,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| AmrError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let ext = if table.delimiter == b'\t' { "tsv" } else { "csv" };
    let mut written = Vec::new();

    let path = dir.join(format!("{stem}_classified.{ext}"));
    write_augmented_table(table, &report.collection, &path, table.delimiter)?;
    written.push(path);

    let path = dir.join(format!("{stem}_category_prevalence.csv"));
    write_category_prevalence(&report.category_prevalence, &path)?;
    written.push(path);

    let path = dir.join(format!("{stem}_resistance_patterns.csv"));
    write_resistance_patterns(&report.resistance_patterns, &path)?;
    written.push(path);

    if let Some(association) = &report.association {
        let path = dir.join(format!("{stem}_proportions.csv"));
        write_proportions(&association.proportions, &path)?;
        written.push(path);

        let path = dir.join(format!("{stem}_odds_ratio.csv"));
        write_odds_ratio(&association.odds_ratio, &path)?;
        written.push(path);
    }

    let path = dir.join(format!("{stem}_report.json"));
    report.save(&path)?;
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{
        CarbapenemStatus, Classification, ClassifiedIsolate, MdrPhenotype,
    };
    use crate::stats::{proportions, ContingencyTable};

    fn classified(phenotype: MdrPhenotype, status: CarbapenemStatus) -> ClassifiedIsolate {
        ClassifiedIsolate {
            id: "x".to_string(),
            classification: Classification {
                category_flags: vec![],
                resistant_categories: 0,
                mdr_phenotype: phenotype,
                carbapenem_status: status,
            },
        }
    }

    #[test]
    fn test_augmented_table_appends_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");

        let table = DataTable::new(
            vec!["id".into(), "colistin".into()],
            vec![vec!["A".into(), "R".into()], vec!["B".into(), "".into()]],
            b'\t',
        );
        let collection = ClassifiedCollection {
            categories: vec![],
            isolates: vec![
                classified(MdrPhenotype::Mdr, CarbapenemStatus::Resistant),
                classified(MdrPhenotype::NonMdr, CarbapenemStatus::Susceptible),
            ],
        };

        write_augmented_table(&table, &collection, &path, b'\t').unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "id\tcolistin\tmdr_phenotype\tcarbapenem_status\n\
             A\tR\tMDR\tResistant\n\
             B\t\tNon-MDR\tSusceptible\n"
        );
    }

    #[test]
    fn test_augmented_table_row_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let table = DataTable::new(vec!["id".into()], vec![vec!["A".into()]], b',');
        let collection = ClassifiedCollection {
            categories: vec![],
            isolates: vec![],
        };

        let err = write_augmented_table(&table, &collection, dir.path().join("x.csv"), b',')
            .unwrap_err();
        assert!(matches!(err, AmrError::Persistence(_)));
    }

    #[test]
    fn test_proportions_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proportions.csv");

        write_proportions(&proportions(&ContingencyTable::new(3, 1, 1, 3)), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();

        assert_eq!(lines[0], "carbapenem_status,mdr_phenotype,count,percentage");
        assert_eq!(lines[1], "Resistant,MDR,3,75.00");
        assert_eq!(lines[2], "Resistant,Non-MDR,1,25.00");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_patterns_file_labels_susceptible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.csv");

        let rows = vec![
            ResistancePattern {
                categories: vec!["aminoglycosides".into(), "colistin".into()],
                count: 4,
            },
            ResistancePattern {
                categories: vec![],
                count: 2,
            },
        ];
        write_resistance_patterns(&rows, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert!(written.contains("aminoglycosides & colistin,2,4"));
        assert!(written.contains("none,0,2"));
    }
}
