//! The odds-ratio record handed to presentation.

use serde::{Deserialize, Serialize};

use super::contingency::ContingencyTable;
use super::fisher::ExactTestResult;
use super::numeric::{check_confidence_level, normal_quantile};
use crate::error::Result;

/// p-values strictly below this are tagged significant.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.01;

/// Continuity correction added to every cell when one cell is zero.
const HALDANE_CORRECTION: f64 = 0.5;

/// Tag for a p-value against [`SIGNIFICANCE_THRESHOLD`].
///
/// A p-value of exactly 0.01 is tagged `"p > 0.01"`.
pub fn significance_tag(p_value: f64) -> &'static str {
    if p_value < SIGNIFICANCE_THRESHOLD {
        "p < 0.01"
    } else {
        "p > 0.01"
    }
}

/// How the estimate and interval were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsRatioMethod {
    /// Conditional MLE with the exact conditional interval.
    ConditionalMle,
    /// Haldane–Anscombe corrected cross-product with a Woolf interval,
    /// used when a cell is zero.
    HaldaneAnscombe,
}

impl OddsRatioMethod {
    pub fn label(&self) -> &'static str {
        match self {
            OddsRatioMethod::ConditionalMle => "conditional MLE",
            OddsRatioMethod::HaldaneAnscombe => "Haldane-Anscombe",
        }
    }
}

/// Point estimate, interval and significance of the MDR/carbapenem
/// association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRatioRecord {
    pub estimate: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub confidence_level: f64,
    pub p_value: f64,
    pub significance: String,
    pub method: OddsRatioMethod,
}

impl OddsRatioRecord {
    /// Build the record from a completed exact test.
    ///
    /// Without zero cells the conditional estimate and exact interval are
    /// finite and are used as-is. With a zero cell they run off to 0 or
    /// infinity, so the corrected cross-product is reported instead.
    pub fn from_exact_test(test: &ExactTestResult) -> Result<Self> {
        check_confidence_level(test.confidence_level)?;
        let (estimate, ci_lower, ci_upper, method) = if test.table.has_zero_cell() {
            let (estimate, lower, upper) = haldane_anscombe(&test.table, test.confidence_level)?;
            (estimate, lower, upper, OddsRatioMethod::HaldaneAnscombe)
        } else {
            (
                test.conditional_odds_ratio,
                test.ci_lower,
                test.ci_upper,
                OddsRatioMethod::ConditionalMle,
            )
        };

        Ok(Self {
            estimate,
            ci_lower,
            ci_upper,
            confidence_level: test.confidence_level,
            p_value: test.p_value,
            significance: significance_tag(test.p_value).to_string(),
            method,
        })
    }
}

/// Corrected cross-product ratio and Woolf logit interval.
///
/// The correction is applied only when some cell is zero. Fails unless
/// `confidence_level` lies strictly between 0 and 1.
pub fn haldane_anscombe(
    table: &ContingencyTable,
    confidence_level: f64,
) -> Result<(f64, f64, f64)> {
    check_confidence_level(confidence_level)?;
    let correction = if table.has_zero_cell() { HALDANE_CORRECTION } else { 0.0 };
    let [a, b, c, d] = table.cells().map(|v| v as f64 + correction);

    let estimate = (a * d) / (b * c);
    let se = (1.0 / a + 1.0 / b + 1.0 / c + 1.0 / d).sqrt();
    let z = normal_quantile(1.0 - (1.0 - confidence_level) / 2.0);
    let log_or = estimate.ln();

    Ok((estimate, (log_or - z * se).exp(), (log_or + z * se).exp()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmrError;
    use crate::stats::fisher_exact;

    #[test]
    fn test_significance_boundary() {
        assert_eq!(significance_tag(0.009_999), "p < 0.01");
        assert_eq!(significance_tag(0.01), "p > 0.01");
        assert_eq!(significance_tag(0.5), "p > 0.01");
        assert_eq!(significance_tag(0.0), "p < 0.01");
    }

    #[test]
    fn test_haldane_on_zero_cell() {
        let (estimate, lower, upper) =
            haldane_anscombe(&ContingencyTable::new(10, 0, 5, 8), 0.95).unwrap();
        assert!((estimate - 10.5 * 8.5 / (0.5 * 5.5)).abs() < 1e-9);
        assert!((lower - 1.563_348).abs() < 1e-4);
        assert!((upper - 673.7447).abs() < 1e-2);
    }

    #[test]
    fn test_haldane_rejects_invalid_confidence_level() {
        let table = ContingencyTable::new(10, 0, 5, 8);
        for level in [0.0, 1.5, f64::NAN] {
            assert!(matches!(
                haldane_anscombe(&table, level),
                Err(AmrError::Config(_))
            ));
        }
    }

    #[test]
    fn test_record_rejects_out_of_range_confidence_level() {
        for table in [ContingencyTable::new(10, 0, 5, 8), ContingencyTable::new(12, 5, 3, 20)] {
            let mut test = fisher_exact(&table, 0.95).unwrap();
            test.confidence_level = 1.5;
            assert!(matches!(
                OddsRatioRecord::from_exact_test(&test),
                Err(AmrError::Config(_))
            ));
        }
    }

    #[test]
    fn test_record_uses_conditional_mle_without_zero_cells() {
        let test = fisher_exact(&ContingencyTable::new(12, 5, 3, 20), 0.95).unwrap();
        let record = OddsRatioRecord::from_exact_test(&test).unwrap();

        assert_eq!(record.method, OddsRatioMethod::ConditionalMle);
        assert_eq!(record.estimate, test.conditional_odds_ratio);
        assert_eq!(record.significance, "p < 0.01");
    }

    #[test]
    fn test_record_is_finite_with_zero_cell() {
        let test = fisher_exact(&ContingencyTable::new(10, 0, 5, 8), 0.95).unwrap();
        let record = OddsRatioRecord::from_exact_test(&test).unwrap();

        assert_eq!(record.method, OddsRatioMethod::HaldaneAnscombe);
        assert!(record.estimate.is_finite());
        assert!(record.ci_lower.is_finite() && record.ci_upper.is_finite());
        assert!(record.ci_lower < record.estimate && record.estimate < record.ci_upper);
    }
}
