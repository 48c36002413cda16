//! The end-to-end pipeline: parse, classify, analyze.

use std::path::Path;

use tracing::debug;

use crate::classify::{CategoryConfig, ClassifiedCollection, IngestConfig, ResistanceClassifier};
use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::report::Report;
use crate::stats::{AnalyzerConfig, AssociationAnalyzer};

/// Configuration for a full run.
#[derive(Debug, Clone, Default)]
pub struct ScopeConfig {
    pub parser: ParserConfig,
    pub categories: CategoryConfig,
    pub ingest: IngestConfig,
    pub analyzer: AnalyzerConfig,
}

/// Runs susceptibility tables through classification and association
/// analysis.
#[derive(Debug, Clone)]
pub struct AmrScope {
    parser: Parser,
    ingest: IngestConfig,
    classifier: ResistanceClassifier,
    analyzer: AssociationAnalyzer,
}

impl AmrScope {
    /// Pipeline over the standard panel with default settings.
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            ingest: IngestConfig::default(),
            classifier: ResistanceClassifier::new(),
            analyzer: AssociationAnalyzer::new(),
        }
    }

    /// Pipeline with custom configuration. Category and analyzer settings
    /// are validated here, before any file is read.
    pub fn with_config(config: ScopeConfig) -> Result<Self> {
        Ok(Self {
            parser: Parser::with_config(config.parser),
            ingest: config.ingest,
            classifier: ResistanceClassifier::with_config(config.categories)?,
            analyzer: AssociationAnalyzer::with_config(config.analyzer)?,
        })
    }

    /// Replace the category configuration.
    pub fn with_categories(mut self, categories: CategoryConfig) -> Result<Self> {
        self.classifier = ResistanceClassifier::with_config(categories)?;
        Ok(self)
    }

    /// Replace the ingest settings.
    pub fn with_ingest(mut self, ingest: IngestConfig) -> Self {
        self.ingest = ingest;
        self
    }

    pub fn categories(&self) -> &CategoryConfig {
        self.classifier.config()
    }

    /// Parse a file into a table and its metadata.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Classify every isolate of a parsed table.
    pub fn classify(&self, table: &DataTable) -> Result<ClassifiedCollection> {
        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "classifying table"
        );
        self.classifier.classify_table(table, &self.ingest)
    }

    /// Classify a table and bundle the result without association analysis.
    pub fn classify_report(
        &self,
        table: &DataTable,
        source: Option<SourceMetadata>,
    ) -> Result<Report> {
        let collection = self.classify(table)?;
        Ok(Report::new(source, self.categories().clone(), collection, None))
    }

    /// Classify and analyze a parsed table.
    ///
    /// A degenerate contingency table fails the run.
    pub fn run_table(&self, table: &DataTable, source: Option<SourceMetadata>) -> Result<Report> {
        let collection = self.classify(table)?;
        let association = self.analyzer.analyze(&collection)?;
        Ok(Report::new(
            source,
            self.categories().clone(),
            collection,
            Some(association),
        ))
    }

    /// Parse, classify and analyze a file.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<Report> {
        let (table, source) = self.load(path)?;
        self.run_table(&table, Some(source))
    }
}

impl Default for AmrScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmrError;
    use crate::stats::ContingencyTable;

    fn table(rows: &[(&str, &str, &str)]) -> DataTable {
        let config = CategoryConfig::standard();
        let drugs = config.required_drugs();
        let mut headers = vec!["isolate_id".to_string()];
        headers.extend(drugs.iter().cloned());

        let rows = rows
            .iter()
            .map(|(id, resistant, value)| {
                let resistant: Vec<&str> = resistant.split(',').collect();
                let mut row = vec![id.to_string()];
                row.extend(drugs.iter().map(|d| {
                    if resistant.contains(&d.as_str()) {
                        value.to_string()
                    } else {
                        "S".to_string()
                    }
                }));
                row
            })
            .collect();
        DataTable::new(headers, rows, b',')
    }

    #[test]
    fn test_run_table_counts_every_isolate() {
        let data = table(&[
            ("a", "amikacin,ciprofloxacin,colistin,meropenem", "R"),
            ("b", "amikacin,ciprofloxacin,colistin", "R"),
            ("c", "imipenem", "R"),
            ("d", "", "R"),
            ("e", "ertapenem,fosfomycin", "R"),
        ]);

        let report = AmrScope::new().run_table(&data, None).unwrap();
        let association = report.association.unwrap();
        assert_eq!(association.table, ContingencyTable::new(1, 1, 2, 1));
        assert_eq!(report.collection.isolates[1].id, "b");
    }

    #[test]
    fn test_classify_report_skips_analysis() {
        let data = table(&[("a", "meropenem", "R")]);

        let report = AmrScope::new().classify_report(&data, None).unwrap();
        assert!(report.association.is_none());
        assert_eq!(report.collection.len(), 1);
    }

    #[test]
    fn test_run_table_degenerate() {
        let data = table(&[("a", "", "R"), ("b", "colistin", "R")]);

        let err = AmrScope::new().run_table(&data, None).unwrap_err();
        assert!(matches!(err, AmrError::DegenerateTable { .. }));
    }

    #[test]
    fn test_lenient_ingest_accepts_unknown_codes() {
        let data = table(&[
            ("a", "amikacin,ciprofloxacin,colistin,meropenem", "R"),
            ("b", "colistin", "X"),
            ("c", "meropenem", "R"),
            ("d", "amikacin,ciprofloxacin,colistin", "R"),
        ]);

        let strict = AmrScope::new();
        assert!(matches!(
            strict.classify(&data).unwrap_err(),
            AmrError::InvalidInterpretation { .. }
        ));

        let lenient = AmrScope::new().with_ingest(IngestConfig {
            policy: crate::classify::InterpretationPolicy::TreatAsMissing,
            ..IngestConfig::default()
        });
        let report = lenient.run_table(&data, None).unwrap();
        assert_eq!(
            report.association.unwrap().table,
            ContingencyTable::new(1, 1, 1, 1)
        );
    }

    #[test]
    fn test_with_config_rejects_bad_confidence() {
        let config = ScopeConfig {
            analyzer: AnalyzerConfig {
                confidence_level: 0.0,
            },
            ..ScopeConfig::default()
        };
        assert!(matches!(
            AmrScope::with_config(config).unwrap_err(),
            AmrError::Config(_)
        ));
    }
}
