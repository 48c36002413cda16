//! Resolution of the category configuration against an input header.
//!
//! Column lookup by name happens exactly once, here. The resulting
//! [`DrugPanel`] maps every required drug to a header position and every
//! category to positions in the panel, so classification never touches
//! column names again.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::categories::{normalize_drug_name, CategoryConfig};
use crate::error::{AmrError, Result};

/// A category expressed as indices into the panel's drug list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelCategory {
    pub name: String,
    pub members: Vec<usize>,
}

/// Drugs required by a [`CategoryConfig`], bound to header positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrugPanel {
    drugs: Vec<String>,
    headers: Vec<String>,
    columns: Vec<usize>,
    categories: Vec<PanelCategory>,
    carbapenems: Vec<usize>,
}

impl DrugPanel {
    /// Bind every drug named by `config` to a column of `headers`.
    ///
    /// Headers are matched on their normalized form. Fails with
    /// [`AmrError::MissingColumn`] listing every absent drug, or
    /// [`AmrError::DuplicateColumn`] if two headers match the same drug.
    pub fn resolve(config: &CategoryConfig, headers: &[String]) -> Result<Self> {
        config.validate()?;

        let drugs = config.required_drugs();
        let wanted: HashMap<&str, usize> = drugs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.as_str(), i))
            .collect();

        let mut found: Vec<Option<usize>> = vec![None; drugs.len()];
        for (col, header) in headers.iter().enumerate() {
            let key = normalize_drug_name(header);
            let Some(&drug_idx) = wanted.get(key.as_str()) else {
                continue;
            };
            if let Some(previous) = found[drug_idx] {
                return Err(AmrError::DuplicateColumn {
                    drug: drugs[drug_idx].clone(),
                    first: headers[previous].clone(),
                    second: header.clone(),
                });
            }
            found[drug_idx] = Some(col);
        }

        let missing: Vec<String> = drugs
            .iter()
            .zip(&found)
            .filter(|(_, col)| col.is_none())
            .map(|(drug, _)| drug.clone())
            .collect();
        if !missing.is_empty() {
            return Err(AmrError::MissingColumn { columns: missing });
        }

        let columns: Vec<usize> = found.into_iter().flatten().collect();
        let panel_headers = columns.iter().map(|&c| headers[c].clone()).collect();

        let index_of = |drug: &String| wanted[normalize_drug_name(drug).as_str()];
        let categories = config
            .categories
            .iter()
            .map(|c| PanelCategory {
                name: c.name.clone(),
                members: c.drugs.iter().map(index_of).collect(),
            })
            .collect();
        let carbapenems = config.carbapenems.iter().map(index_of).collect();

        debug!(
            drugs = drugs.len(),
            categories = config.len(),
            "resolved drug panel against header"
        );

        Ok(Self {
            drugs,
            headers: panel_headers,
            columns,
            categories,
            carbapenems,
        })
    }

    /// Normalized drug names, in panel order.
    pub fn drugs(&self) -> &[String] {
        &self.drugs
    }

    /// Number of drugs in the panel.
    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    /// Panel position of a drug, by any spelling that normalizes to it.
    pub fn drug_index(&self, drug: &str) -> Option<usize> {
        let key = normalize_drug_name(drug);
        self.drugs.iter().position(|d| *d == key)
    }

    /// Header position backing the drug at `drug_idx`.
    pub fn column(&self, drug_idx: usize) -> usize {
        self.columns[drug_idx]
    }

    /// Original header text backing the drug at `drug_idx`.
    pub fn header(&self, drug_idx: usize) -> &str {
        &self.headers[drug_idx]
    }

    pub fn categories(&self) -> &[PanelCategory] {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn carbapenems(&self) -> &[usize] {
        &self.carbapenems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_headers() -> Vec<String> {
        let mut headers = vec!["isolate_id".to_string()];
        headers.extend(CategoryConfig::standard().required_drugs());
        headers
    }

    #[test]
    fn test_resolve_standard_panel() {
        let headers = standard_headers();
        let panel = DrugPanel::resolve(&CategoryConfig::standard(), &headers).unwrap();

        assert_eq!(panel.len(), 21);
        assert_eq!(panel.categories().len(), 8);
        assert_eq!(panel.carbapenems().len(), 3);
        assert_eq!(panel.column(0), 1);

        let meropenem = panel.drug_index("Meropenem").unwrap();
        assert!(panel.carbapenems().contains(&meropenem));
        assert!(panel.categories()[1].members.contains(&meropenem));
    }

    #[test]
    fn test_resolve_matches_display_headers() {
        let mut headers = standard_headers();
        for h in headers.iter_mut() {
            if h == "amoxicillin_clavulanic_acid" {
                *h = "Amoxicillin/Clavulanic Acid".to_string();
            }
        }
        let panel = DrugPanel::resolve(&CategoryConfig::standard(), &headers).unwrap();
        let idx = panel.drug_index("amoxicillin_clavulanic_acid").unwrap();
        assert_eq!(panel.header(idx), "Amoxicillin/Clavulanic Acid");
    }

    #[test]
    fn test_missing_columns_are_named() {
        let headers: Vec<String> = standard_headers()
            .into_iter()
            .filter(|h| h != "colistin" && h != "imipenem")
            .collect();

        let err = DrugPanel::resolve(&CategoryConfig::standard(), &headers).unwrap_err();
        match err {
            AmrError::MissingColumn { columns } => {
                assert_eq!(columns, vec!["imipenem", "colistin"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let mut headers = standard_headers();
        headers.push("COLISTIN".to_string());

        let err = DrugPanel::resolve(&CategoryConfig::standard(), &headers).unwrap_err();
        assert!(matches!(err, AmrError::DuplicateColumn { ref drug, .. } if drug == "colistin"));
    }
}
