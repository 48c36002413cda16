//! Multidrug-resistance and carbapenem-resistance classification.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::categories::{CategoryConfig, MDR_CATEGORY_THRESHOLD};
use super::panel::DrugPanel;
use super::record::{IngestConfig, IsolateRecord, IsolateTable};
use crate::error::Result;
use crate::input::DataTable;

/// Overall multidrug-resistance label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MdrPhenotype {
    #[serde(rename = "MDR")]
    Mdr,
    #[serde(rename = "Non-MDR")]
    NonMdr,
}

impl MdrPhenotype {
    /// Contingency-table row order.
    pub const ALL: [MdrPhenotype; 2] = [MdrPhenotype::Mdr, MdrPhenotype::NonMdr];

    /// Label for a number of resistant categories.
    pub fn from_resistant_count(count: usize) -> Self {
        if count >= MDR_CATEGORY_THRESHOLD {
            MdrPhenotype::Mdr
        } else {
            MdrPhenotype::NonMdr
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MdrPhenotype::Mdr => "MDR",
            MdrPhenotype::NonMdr => "Non-MDR",
        }
    }
}

impl std::fmt::Display for MdrPhenotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Binary carbapenem-resistance label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarbapenemStatus {
    Resistant,
    Susceptible,
}

impl CarbapenemStatus {
    /// Contingency-table column order.
    pub const ALL: [CarbapenemStatus; 2] = [CarbapenemStatus::Resistant, CarbapenemStatus::Susceptible];

    pub fn label(&self) -> &'static str {
        match self {
            CarbapenemStatus::Resistant => "Resistant",
            CarbapenemStatus::Susceptible => "Susceptible",
        }
    }
}

impl std::fmt::Display for CarbapenemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived attributes of one isolate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// One flag per category, in panel order.
    pub category_flags: Vec<bool>,
    /// Number of `true` entries in `category_flags`.
    pub resistant_categories: usize,
    pub mdr_phenotype: MdrPhenotype,
    pub carbapenem_status: CarbapenemStatus,
}

/// An isolate identifier with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedIsolate {
    pub id: String,
    #[serde(flatten)]
    pub classification: Classification,
}

/// Isolates resistant in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPrevalence {
    pub category: String,
    pub resistant: usize,
    pub percentage: f64,
}

/// Isolates sharing one exact combination of resistant categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResistancePattern {
    /// Resistant categories, in panel order. Empty for pan-susceptible.
    pub categories: Vec<String>,
    pub count: usize,
}

/// The augmented isolate collection the association analysis consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCollection {
    /// Category names, indexing each isolate's `category_flags`.
    pub categories: Vec<String>,
    pub isolates: Vec<ClassifiedIsolate>,
}

impl ClassifiedCollection {
    pub fn len(&self) -> usize {
        self.isolates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.isolates.is_empty()
    }

    /// Number of isolates labelled MDR.
    pub fn mdr_count(&self) -> usize {
        self.isolates
            .iter()
            .filter(|i| i.classification.mdr_phenotype == MdrPhenotype::Mdr)
            .count()
    }

    /// Number of carbapenem-resistant isolates.
    pub fn carbapenem_resistant_count(&self) -> usize {
        self.isolates
            .iter()
            .filter(|i| i.classification.carbapenem_status == CarbapenemStatus::Resistant)
            .count()
    }

    /// Resistant isolates per category, in panel order.
    pub fn category_prevalence(&self) -> Vec<CategoryPrevalence> {
        let total = self.isolates.len();
        self.categories
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let resistant = self
                    .isolates
                    .iter()
                    .filter(|i| i.classification.category_flags.get(idx).copied().unwrap_or(false))
                    .count();
                CategoryPrevalence {
                    category: name.clone(),
                    resistant,
                    percentage: percentage(resistant, total),
                }
            })
            .collect()
    }

    /// Distinct resistant-category combinations, most frequent first.
    /// Ties keep first-seen order.
    pub fn resistance_patterns(&self) -> Vec<ResistancePattern> {
        let mut counts: IndexMap<Vec<bool>, usize> = IndexMap::new();
        for isolate in &self.isolates {
            *counts
                .entry(isolate.classification.category_flags.clone())
                .or_insert(0) += 1;
        }

        let mut patterns: Vec<ResistancePattern> = counts
            .into_iter()
            .map(|(flags, count)| ResistancePattern {
                categories: flags
                    .iter()
                    .zip(&self.categories)
                    .filter(|(flag, _)| **flag)
                    .map(|(_, name)| name.clone())
                    .collect(),
                count,
            })
            .collect();
        patterns.sort_by(|a, b| b.count.cmp(&a.count));
        patterns
    }
}

pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Applies the category rule, the MDR threshold and the carbapenem rule.
#[derive(Debug, Clone)]
pub struct ResistanceClassifier {
    config: CategoryConfig,
}

impl ResistanceClassifier {
    /// Classifier over the standard panel.
    pub fn new() -> Self {
        Self {
            config: CategoryConfig::standard(),
        }
    }

    /// Classifier over a custom panel. The configuration is validated here.
    pub fn with_config(config: CategoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CategoryConfig {
        &self.config
    }

    /// Bind this classifier's panel to an input header.
    pub fn resolve(&self, headers: &[String]) -> Result<DrugPanel> {
        DrugPanel::resolve(&self.config, headers)
    }

    /// Classify one isolate.
    ///
    /// A category is resistant when any member drug is called R; missing
    /// calls, including for single-drug categories, are not resistance
    /// evidence. The carbapenem status is read from the carbapenem drugs
    /// directly, never from the beta-lactam flag.
    pub fn classify(&self, panel: &DrugPanel, record: &IsolateRecord) -> Classification {
        let category_flags: Vec<bool> = panel
            .categories()
            .iter()
            .map(|c| c.members.iter().any(|&d| record.is_resistant(d)))
            .collect();
        let resistant_categories = category_flags.iter().filter(|&&f| f).count();

        let carbapenem_status = if panel.carbapenems().iter().any(|&d| record.is_resistant(d)) {
            CarbapenemStatus::Resistant
        } else {
            CarbapenemStatus::Susceptible
        };

        Classification {
            category_flags,
            resistant_categories,
            mdr_phenotype: MdrPhenotype::from_resistant_count(resistant_categories),
            carbapenem_status,
        }
    }

    /// Classify every isolate of an ingested table.
    pub fn classify_all(&self, table: &IsolateTable) -> ClassifiedCollection {
        let isolates: Vec<ClassifiedIsolate> = table
            .records
            .iter()
            .map(|record| ClassifiedIsolate {
                id: record.id.clone(),
                classification: self.classify(&table.panel, record),
            })
            .collect();

        let collection = ClassifiedCollection {
            categories: table.panel.category_names().into_iter().map(String::from).collect(),
            isolates,
        };

        info!(
            isolates = collection.len(),
            mdr = collection.mdr_count(),
            carbapenem_resistant = collection.carbapenem_resistant_count(),
            "classified isolates"
        );

        collection
    }

    /// Resolve, ingest and classify a parsed table in one step.
    ///
    /// Schema problems surface before any row is decoded, and any row
    /// error aborts the whole run.
    pub fn classify_table(
        &self,
        table: &DataTable,
        ingest: &IngestConfig,
    ) -> Result<ClassifiedCollection> {
        let panel = self.resolve(&table.headers)?;
        let isolates = IsolateTable::ingest(table, &panel, ingest)?;
        Ok(self.classify_all(&isolates))
    }
}

impl Default for ResistanceClassifier {
    fn default() -> Self {
        Self::new()
    }
}
