//! Antimicrobial category definitions.
//!
//! A [`CategoryConfig`] is the static drug-to-category mapping the classifier
//! works from. It is plain data: the standard panel is built in, and an
//! alternative can be loaded from JSON, but once a classifier holds one it
//! never changes.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AmrError, Result};

/// Number of resistant categories at which an isolate is labelled MDR.
pub const MDR_CATEGORY_THRESHOLD: usize = 3;

/// Carbapenems that decide the carbapenem-resistance status.
pub const CARBAPENEMS: &[&str] = &["ertapenem", "imipenem", "meropenem"];

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Canonical form of a drug or header name: lowercase, with every run of
/// non-alphanumeric characters collapsed to a single underscore.
///
/// `"Amoxicillin/Clavulanic acid"` becomes `"amoxicillin_clavulanic_acid"`.
pub fn normalize_drug_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    NON_ALNUM
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// A named group of drugs sharing a resistance mechanism class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntimicrobialCategory {
    /// Display name, e.g. "aminoglycosides".
    pub name: String,
    /// Member drug names.
    pub drugs: Vec<String>,
}

impl AntimicrobialCategory {
    pub fn new(name: impl Into<String>, drugs: &[&str]) -> Self {
        Self {
            name: name.into(),
            drugs: drugs.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// A category holding exactly one drug, named after it.
    pub fn singleton(drug: &str) -> Self {
        Self::new(drug, &[drug])
    }

    pub fn is_singleton(&self) -> bool {
        self.drugs.len() == 1
    }
}

/// Category membership plus the carbapenem set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Categories in reporting order.
    pub categories: Vec<AntimicrobialCategory>,
    /// Drugs whose resistance marks an isolate carbapenem-resistant.
    pub carbapenems: Vec<String>,
}

impl CategoryConfig {
    /// The standard eight-category Enterobacterales panel.
    pub fn standard() -> Self {
        Self {
            categories: vec![
                AntimicrobialCategory::new(
                    "aminoglycosides",
                    &["amikacin", "gentamicin", "tobramycin"],
                ),
                AntimicrobialCategory::new(
                    "beta-lactams",
                    &[
                        "ampicillin",
                        "amoxicillin_clavulanic_acid",
                        "piperacillin_tazobactam",
                        "cefuroxime",
                        "cefoxitin",
                        "ceftazidime",
                        "ceftriaxone",
                        "cefepime",
                        "ertapenem",
                        "imipenem",
                        "meropenem",
                    ],
                ),
                AntimicrobialCategory::new("fluoroquinolones", &["ciprofloxacin", "levofloxacin"]),
                AntimicrobialCategory::new(
                    "folate-pathway inhibitors",
                    &["trimethoprim_sulfamethoxazole"],
                ),
                AntimicrobialCategory::singleton("colistin"),
                AntimicrobialCategory::singleton("fosfomycin"),
                AntimicrobialCategory::singleton("nitrofurantoin"),
                AntimicrobialCategory::singleton("tigecycline"),
            ],
            carbapenems: CARBAPENEMS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Check the configuration is usable.
    ///
    /// Categories must be non-empty and named uniquely, every drug may belong
    /// to at most one category, and the carbapenem set must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(AmrError::Config("no antimicrobial categories defined".to_string()));
        }
        if self.carbapenems.is_empty() {
            return Err(AmrError::Config("carbapenem set is empty".to_string()));
        }

        let mut owner: HashMap<String, &str> = HashMap::new();
        let mut names: HashSet<&str> = HashSet::new();

        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(AmrError::Config("category with empty name".to_string()));
            }
            if !names.insert(category.name.as_str()) {
                return Err(AmrError::Config(format!(
                    "category '{}' defined more than once",
                    category.name
                )));
            }
            if category.drugs.is_empty() {
                return Err(AmrError::Config(format!(
                    "category '{}' has no drugs",
                    category.name
                )));
            }
            for drug in &category.drugs {
                let key = normalize_drug_name(drug);
                if key.is_empty() {
                    return Err(AmrError::Config(format!(
                        "category '{}' contains an empty drug name",
                        category.name
                    )));
                }
                if let Some(previous) = owner.insert(key, category.name.as_str()) {
                    return Err(AmrError::Config(format!(
                        "drug '{}' belongs to both '{}' and '{}'",
                        drug, previous, category.name
                    )));
                }
            }
        }

        if self.carbapenems.iter().any(|d| normalize_drug_name(d).is_empty()) {
            return Err(AmrError::Config("carbapenem set contains an empty drug name".to_string()));
        }

        Ok(())
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Every drug the classifier needs, categories first then carbapenems,
    /// deduplicated on the normalized name.
    pub fn required_drugs(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.categories
            .iter()
            .flat_map(|c| c.drugs.iter())
            .chain(self.carbapenems.iter())
            .map(|d| normalize_drug_name(d))
            .filter(|d| seen.insert(d.clone()))
            .collect()
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AmrError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: CategoryConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AmrError::Config(format!(
                "failed to parse category configuration '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| AmrError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self::standard()
    }
}
