//! Susceptibility interpretation codes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AmrError, Result};
use crate::input::DataTable;

/// Clinical interpretation of a susceptibility test for one drug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpretation {
    Susceptible,
    Intermediate,
    Resistant,
}

impl Interpretation {
    /// Decode an S/I/R code (or the full word), case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.eq_ignore_ascii_case("s") || code.eq_ignore_ascii_case("susceptible") {
            Some(Interpretation::Susceptible)
        } else if code.eq_ignore_ascii_case("i") || code.eq_ignore_ascii_case("intermediate") {
            Some(Interpretation::Intermediate)
        } else if code.eq_ignore_ascii_case("r") || code.eq_ignore_ascii_case("resistant") {
            Some(Interpretation::Resistant)
        } else {
            None
        }
    }

    /// Single-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Interpretation::Susceptible => "S",
            Interpretation::Intermediate => "I",
            Interpretation::Resistant => "R",
        }
    }

    pub fn is_resistant(&self) -> bool {
        matches!(self, Interpretation::Resistant)
    }
}

impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What to do with a cell that is neither S/I/R nor a missing marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretationPolicy {
    /// Fail the run, naming the row, column and value.
    #[default]
    Reject,
    /// Record the call as missing and log a warning.
    TreatAsMissing,
}

/// Decode one cell under the given policy.
///
/// `row` is the 1-based data row, used only for error reporting.
pub fn decode_cell(
    raw: &str,
    policy: InterpretationPolicy,
    row: usize,
    column: &str,
) -> Result<Option<Interpretation>> {
    if DataTable::is_null_value(raw) {
        return Ok(None);
    }

    match Interpretation::from_code(raw) {
        Some(interp) => Ok(Some(interp)),
        None => match policy {
            InterpretationPolicy::Reject => Err(AmrError::InvalidInterpretation {
                row,
                column: column.to_string(),
                value: raw.to_string(),
            }),
            InterpretationPolicy::TreatAsMissing => {
                warn!(row, column, value = raw, "unrecognized interpretation treated as missing");
                Ok(None)
            }
        },
    }
}
