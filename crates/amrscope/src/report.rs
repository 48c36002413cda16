//! Result bundle of a run, and its JSON persistence.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{CategoryConfig, CategoryPrevalence, ClassifiedCollection, ResistancePattern};
use crate::error::{AmrError, Result};
use crate::input::SourceMetadata;
use crate::stats::AssociationResult;

/// Everything a run produced, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Input provenance; absent when the table did not come from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Category configuration the isolates were classified with.
    pub categories: CategoryConfig,
    pub collection: ClassifiedCollection,
    pub category_prevalence: Vec<CategoryPrevalence>,
    pub resistance_patterns: Vec<ResistancePattern>,
    /// Association analysis; absent for classification-only runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<AssociationResult>,
}

impl Report {
    /// Bundle a classified collection, deriving its summaries.
    pub fn new(
        source: Option<SourceMetadata>,
        categories: CategoryConfig,
        collection: ClassifiedCollection,
        association: Option<AssociationResult>,
    ) -> Self {
        let category_prevalence = collection.category_prevalence();
        let resistance_patterns = collection.resistance_patterns();
        Self {
            source,
            categories,
            collection,
            category_prevalence,
            resistance_patterns,
            association,
        }
    }

    /// Save the report as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AmrError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            AmrError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            AmrError::Persistence(format!("Failed to serialize report: {}", e))
        })
    }

    /// Load a report saved with [`Report::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            AmrError::Persistence(format!("Failed to open file '{}': {}", path.display(), e))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AmrError::Persistence(format!("Failed to parse report '{}': {}", path.display(), e))
        })
    }
}
