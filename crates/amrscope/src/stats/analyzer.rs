//! Association between MDR phenotype and carbapenem resistance.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::contingency::ContingencyTable;
use super::fisher::{fisher_exact, ExactTestResult};
use super::numeric::check_confidence_level;
use super::odds_ratio::OddsRatioRecord;
use crate::classify::{percentage, CarbapenemStatus, ClassifiedCollection, MdrPhenotype};
use crate::error::Result;

/// Analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Two-sided confidence level of the odds-ratio interval.
    pub confidence_level: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        check_confidence_level(self.confidence_level)
    }
}

/// Share of one MDR phenotype within one carbapenem-status group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionRow {
    pub carbapenem_status: CarbapenemStatus,
    pub mdr_phenotype: MdrPhenotype,
    pub count: usize,
    /// Percentage of the carbapenem-status group, 0–100.
    pub percentage: f64,
}

/// Everything the presentation layer needs from one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationResult {
    pub table: ContingencyTable,
    pub exact_test: ExactTestResult,
    pub odds_ratio: OddsRatioRecord,
    pub proportions: Vec<ProportionRow>,
}

/// Cross-tabulates a classified collection and tests the association.
#[derive(Debug, Clone, Default)]
pub struct AssociationAnalyzer {
    config: AnalyzerConfig,
}

impl AssociationAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a fully classified collection.
    ///
    /// Fails with [`AmrError::DegenerateTable`](crate::error::AmrError::DegenerateTable), carrying the table, when a
    /// phenotype or status group is empty.
    pub fn analyze(&self, collection: &ClassifiedCollection) -> Result<AssociationResult> {
        let table = ContingencyTable::from_collection(collection);
        debug_assert_eq!(table.total(), collection.len());
        self.analyze_table(&table)
    }

    /// Analyze a table of counts directly.
    pub fn analyze_table(&self, table: &ContingencyTable) -> Result<AssociationResult> {
        let exact_test = fisher_exact(table, self.config.confidence_level).inspect_err(|e| {
            warn!(table = %table, error = %e, "association analysis not possible");
        })?;
        let odds_ratio = OddsRatioRecord::from_exact_test(&exact_test)?;

        info!(
            table = %table,
            p_value = exact_test.p_value,
            odds_ratio = odds_ratio.estimate,
            method = odds_ratio.method.label(),
            "tested MDR / carbapenem association"
        );

        Ok(AssociationResult {
            table: *table,
            exact_test,
            odds_ratio,
            proportions: proportions(table),
        })
    }
}

/// MDR vs Non-MDR counts and percentages within each carbapenem group.
pub fn proportions(table: &ContingencyTable) -> Vec<ProportionRow> {
    CarbapenemStatus::ALL
        .iter()
        .flat_map(|&status| {
            let group = table.column_total(status);
            MdrPhenotype::ALL.iter().map(move |&phenotype| {
                let count = table.get(phenotype, status);
                ProportionRow {
                    carbapenem_status: status,
                    mdr_phenotype: phenotype,
                    count,
                    percentage: percentage(count, group),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classification, ClassifiedIsolate};
    use crate::error::AmrError;
    use crate::stats::OddsRatioMethod;

    fn collection_from_counts(table: &ContingencyTable) -> ClassifiedCollection {
        let mut isolates = Vec::new();
        for phenotype in MdrPhenotype::ALL {
            for status in CarbapenemStatus::ALL {
                for _ in 0..table.get(phenotype, status) {
                    isolates.push(ClassifiedIsolate {
                        id: format!("iso{}", isolates.len() + 1),
                        classification: Classification {
                            category_flags: Vec::new(),
                            resistant_categories: 0,
                            mdr_phenotype: phenotype,
                            carbapenem_status: status,
                        },
                    });
                }
            }
        }
        ClassifiedCollection {
            categories: Vec::new(),
            isolates,
        }
    }

    #[test]
    fn test_analyze_zero_cell_table() {
        let counts = ContingencyTable::new(10, 0, 5, 8);
        let collection = collection_from_counts(&counts);

        let result = AssociationAnalyzer::new().analyze(&collection).unwrap();
        assert_eq!(result.table, counts);
        assert_eq!(result.table.total(), 23);
        assert_eq!(result.odds_ratio.method, OddsRatioMethod::HaldaneAnscombe);
        assert!(result.odds_ratio.estimate.is_finite());
        assert_eq!(result.odds_ratio.significance, "p < 0.01");
    }

    #[test]
    fn test_analyze_empty_row_reports_table() {
        let collection = collection_from_counts(&ContingencyTable::new(0, 0, 5, 8));

        match AssociationAnalyzer::new().analyze(&collection).unwrap_err() {
            AmrError::DegenerateTable { table, empty } => {
                assert_eq!(table.cells(), [0, 0, 5, 8]);
                assert_eq!(empty, vec!["row MDR is empty"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let collection = collection_from_counts(&ContingencyTable::new(9, 4, 6, 15));
        let analyzer = AssociationAnalyzer::new();

        let first = analyzer.analyze(&collection).unwrap();
        let second = analyzer.analyze(&collection).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_proportions_order_and_percentages() {
        let rows = proportions(&ContingencyTable::new(3, 1, 1, 3));

        let order: Vec<_> = rows
            .iter()
            .map(|r| (r.carbapenem_status, r.mdr_phenotype))
            .collect();
        assert_eq!(
            order,
            vec![
                (CarbapenemStatus::Resistant, MdrPhenotype::Mdr),
                (CarbapenemStatus::Resistant, MdrPhenotype::NonMdr),
                (CarbapenemStatus::Susceptible, MdrPhenotype::Mdr),
                (CarbapenemStatus::Susceptible, MdrPhenotype::NonMdr),
            ]
        );
        assert_eq!(rows[0].count, 3);
        assert!((rows[0].percentage - 75.0).abs() < 1e-12);
        assert!((rows[3].percentage - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_confidence_level() {
        let err = AssociationAnalyzer::with_config(AnalyzerConfig {
            confidence_level: 1.0,
        })
        .unwrap_err();
        assert!(matches!(err, AmrError::Config(_)));
    }
}
