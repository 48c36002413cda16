//! Contingency analysis: exact test and odds ratio.

mod analyzer;
mod contingency;
mod fisher;
mod hypergeometric;
mod numeric;
mod odds_ratio;

pub use analyzer::{
    proportions, AnalyzerConfig, AssociationAnalyzer, AssociationResult, ProportionRow,
};
pub use contingency::ContingencyTable;
pub use fisher::{fisher_exact, ExactTestResult};
pub use numeric::unbounded;
pub use odds_ratio::{
    haldane_anscombe, significance_tag, OddsRatioMethod, OddsRatioRecord, SIGNIFICANCE_THRESHOLD,
};
