//! 2×2 cross-tabulation of MDR phenotype against carbapenem status.

use serde::{Deserialize, Serialize};

use crate::classify::{CarbapenemStatus, ClassifiedCollection, MdrPhenotype};
use crate::error::{AmrError, Result};

/// Counts of isolates by (MDR phenotype, carbapenem status).
///
/// Rows are `[MDR, Non-MDR]`, columns `[Resistant, Susceptible]`:
///
/// ```text
///              Resistant  Susceptible
///   MDR            a           b
///   Non-MDR        c           d
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub mdr_resistant: usize,
    pub mdr_susceptible: usize,
    pub non_mdr_resistant: usize,
    pub non_mdr_susceptible: usize,
}

impl ContingencyTable {
    /// Build from cells in row-major order `a, b, c, d`.
    pub fn new(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self {
            mdr_resistant: a,
            mdr_susceptible: b,
            non_mdr_resistant: c,
            non_mdr_susceptible: d,
        }
    }

    /// Cross-tabulate a classified collection.
    pub fn from_collection(collection: &ClassifiedCollection) -> Self {
        let mut table = Self::default();
        for isolate in &collection.isolates {
            let c = &isolate.classification;
            *table.cell_mut(c.mdr_phenotype, c.carbapenem_status) += 1;
        }
        table
    }

    pub fn get(&self, phenotype: MdrPhenotype, status: CarbapenemStatus) -> usize {
        match (phenotype, status) {
            (MdrPhenotype::Mdr, CarbapenemStatus::Resistant) => self.mdr_resistant,
            (MdrPhenotype::Mdr, CarbapenemStatus::Susceptible) => self.mdr_susceptible,
            (MdrPhenotype::NonMdr, CarbapenemStatus::Resistant) => self.non_mdr_resistant,
            (MdrPhenotype::NonMdr, CarbapenemStatus::Susceptible) => self.non_mdr_susceptible,
        }
    }

    fn cell_mut(&mut self, phenotype: MdrPhenotype, status: CarbapenemStatus) -> &mut usize {
        match (phenotype, status) {
            (MdrPhenotype::Mdr, CarbapenemStatus::Resistant) => &mut self.mdr_resistant,
            (MdrPhenotype::Mdr, CarbapenemStatus::Susceptible) => &mut self.mdr_susceptible,
            (MdrPhenotype::NonMdr, CarbapenemStatus::Resistant) => &mut self.non_mdr_resistant,
            (MdrPhenotype::NonMdr, CarbapenemStatus::Susceptible) => &mut self.non_mdr_susceptible,
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> [usize; 4] {
        [
            self.mdr_resistant,
            self.mdr_susceptible,
            self.non_mdr_resistant,
            self.non_mdr_susceptible,
        ]
    }

    pub fn row_total(&self, phenotype: MdrPhenotype) -> usize {
        CarbapenemStatus::ALL.iter().map(|&s| self.get(phenotype, s)).sum()
    }

    pub fn column_total(&self, status: CarbapenemStatus) -> usize {
        MdrPhenotype::ALL.iter().map(|&p| self.get(p, status)).sum()
    }

    pub fn total(&self) -> usize {
        self.cells().iter().sum()
    }

    pub fn has_zero_cell(&self) -> bool {
        self.cells().contains(&0)
    }

    /// Descriptions of the margins that sum to zero, e.g. `"row MDR is empty"`.
    pub fn empty_margins(&self) -> Vec<String> {
        let rows = MdrPhenotype::ALL
            .iter()
            .filter(|&&p| self.row_total(p) == 0)
            .map(|p| format!("row {p} is empty"));
        let columns = CarbapenemStatus::ALL
            .iter()
            .filter(|&&s| self.column_total(s) == 0)
            .map(|s| format!("column carbapenem-{s} is empty"));
        rows.chain(columns).collect()
    }

    /// Fail with [`AmrError::DegenerateTable`] when any margin is zero.
    pub fn ensure_non_degenerate(&self) -> Result<()> {
        let empty = self.empty_margins();
        if empty.is_empty() {
            Ok(())
        } else {
            Err(AmrError::DegenerateTable { table: *self, empty })
        }
    }
}

impl std::fmt::Display for ContingencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[[{}, {}], [{}, {}]]",
            self.mdr_resistant, self.mdr_susceptible, self.non_mdr_resistant, self.non_mdr_susceptible
        )
    }
}
