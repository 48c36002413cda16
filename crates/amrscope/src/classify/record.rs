//! Typed isolate records built from a parsed table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interpretation::{decode_cell, Interpretation, InterpretationPolicy};
use super::panel::DrugPanel;
use crate::error::{AmrError, Result};
use crate::input::DataTable;

/// Headers tried, in order, when no identifier column is configured.
const ID_COLUMN_CANDIDATES: &[&str] = &["isolate_id", "sample_id", "isolate", "id"];

/// Options for turning raw rows into isolate records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Header holding the isolate identifier. When unset, the first of
    /// `isolate_id`, `sample_id`, `isolate`, `id` present is used, falling
    /// back to the 1-based row number.
    pub id_column: Option<String>,
    /// Handling of codes outside {S, I, R, missing}.
    pub policy: InterpretationPolicy,
}

/// One isolate: an opaque identifier and one call per panel drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsolateRecord {
    pub id: String,
    /// Calls in [`DrugPanel`] order; `None` is a missing value.
    pub calls: Vec<Option<Interpretation>>,
}

impl IsolateRecord {
    pub fn new(id: impl Into<String>, calls: Vec<Option<Interpretation>>) -> Self {
        Self {
            id: id.into(),
            calls,
        }
    }

    /// Call for the drug at panel position `drug_idx`.
    pub fn call(&self, drug_idx: usize) -> Option<Interpretation> {
        self.calls.get(drug_idx).copied().flatten()
    }

    /// Whether the drug at `drug_idx` was called resistant. Missing is not.
    pub fn is_resistant(&self, drug_idx: usize) -> bool {
        self.call(drug_idx).is_some_and(|c| c.is_resistant())
    }
}

/// Every isolate of an input table, bound to the panel used to read it.
#[derive(Debug, Clone)]
pub struct IsolateTable {
    pub panel: DrugPanel,
    pub records: Vec<IsolateRecord>,
}

impl IsolateTable {
    /// Decode every row of `table` against `panel`.
    ///
    /// Fails on the first invalid code when the policy is
    /// [`InterpretationPolicy::Reject`].
    pub fn ingest(table: &DataTable, panel: &DrugPanel, config: &IngestConfig) -> Result<Self> {
        let id_col = resolve_id_column(table, config.id_column.as_deref())?;

        let mut records = Vec::with_capacity(table.row_count());
        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_number = row_idx + 1;

            let id = match id_col {
                Some(col) => row.get(col).map(|s| s.trim().to_string()).unwrap_or_default(),
                None => row_number.to_string(),
            };

            let calls = (0..panel.len())
                .map(|drug_idx| {
                    let raw = row.get(panel.column(drug_idx)).map(String::as_str).unwrap_or("");
                    decode_cell(raw, config.policy, row_number, panel.header(drug_idx))
                })
                .collect::<Result<Vec<_>>>()?;

            records.push(IsolateRecord::new(id, calls));
        }

        debug!(
            isolates = records.len(),
            id_column = id_col.map(|c| table.headers[c].as_str()).unwrap_or("<row number>"),
            "ingested isolate records"
        );

        Ok(Self {
            panel: panel.clone(),
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn resolve_id_column(table: &DataTable, configured: Option<&str>) -> Result<Option<usize>> {
    if let Some(name) = configured {
        return table
            .column_index(name)
            .map(Some)
            .ok_or_else(|| AmrError::MissingColumn {
                columns: vec![name.to_string()],
            });
    }

    Ok(ID_COLUMN_CANDIDATES.iter().find_map(|candidate| {
        table
            .headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(candidate))
    }))
}
