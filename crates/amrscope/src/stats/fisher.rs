//! Fisher's exact test for 2×2 tables, with the conditional maximum
//! likelihood odds ratio and its exact confidence interval.

use serde::{Deserialize, Serialize};

use super::contingency::ContingencyTable;
use super::hypergeometric::NoncentralHypergeometric;
use super::numeric::{brent_root, check_confidence_level, unbounded, ROOT_TOLERANCE};
use crate::error::Result;

/// Relative slack when comparing table probabilities, so tables tied with
/// the observed one are not lost to rounding.
const RELATIVE_TIE_TOLERANCE: f64 = 1.0 + 1e-7;

/// Outcome of the exact test on one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactTestResult {
    pub table: ContingencyTable,
    /// Two-sided p-value.
    pub p_value: f64,
    /// One-sided p-value for odds ratio < 1.
    pub p_value_less: f64,
    /// One-sided p-value for odds ratio > 1.
    pub p_value_greater: f64,
    /// Conditional maximum likelihood estimate of the odds ratio; 0 or
    /// infinite when the observed cell sits at the edge of its support.
    #[serde(with = "unbounded")]
    pub conditional_odds_ratio: f64,
    #[serde(with = "unbounded")]
    pub ci_lower: f64,
    #[serde(with = "unbounded")]
    pub ci_upper: f64,
    pub confidence_level: f64,
}

/// Run the test.
///
/// Fails with [`AmrError::Config`](crate::error::AmrError::Config) unless
/// `confidence_level` lies strictly between 0 and 1, and with
/// [`AmrError::DegenerateTable`](crate::error::AmrError::DegenerateTable)
/// on a table with an empty margin.
pub fn fisher_exact(table: &ContingencyTable, confidence_level: f64) -> Result<ExactTestResult> {
    check_confidence_level(confidence_level)?;
    table.ensure_non_degenerate()?;

    let [a, b, c, d] = table.cells();
    let dist = NoncentralHypergeometric::new(a + c, b + d, a + b);
    let x = a;

    let central = dist.density(1.0);
    let observed = central[x - dist.lo()] * RELATIVE_TIE_TOLERANCE;
    let p_value = central
        .iter()
        .filter(|&&p| p <= observed)
        .sum::<f64>()
        .min(1.0);

    let alpha = (1.0 - confidence_level) / 2.0;

    Ok(ExactTestResult {
        table: *table,
        p_value,
        p_value_less: dist.cdf_lower(x, 1.0).min(1.0),
        p_value_greater: dist.cdf_upper(x, 1.0).min(1.0),
        conditional_odds_ratio: conditional_mle(&dist, x),
        ci_lower: lower_bound(&dist, x, alpha),
        ci_upper: upper_bound(&dist, x, alpha),
        confidence_level,
    })
}

/// Odds ratio whose conditional mean of the cell equals the observation.
fn conditional_mle(dist: &NoncentralHypergeometric, x: usize) -> f64 {
    if x == dist.lo() {
        return 0.0;
    }
    if x == dist.hi() {
        return f64::INFINITY;
    }

    let target = x as f64;
    let mu = dist.mean(1.0);
    if mu > target {
        brent_root(|t| dist.mean(t) - target, 0.0, 1.0, ROOT_TOLERANCE)
    } else if mu < target {
        1.0 / brent_root(|t| dist.mean(1.0 / t) - target, f64::EPSILON, 1.0, ROOT_TOLERANCE)
    } else {
        1.0
    }
}

/// Smallest odds ratio not rejected by the upper-tail test at `alpha`.
fn lower_bound(dist: &NoncentralHypergeometric, x: usize, alpha: f64) -> f64 {
    if x == dist.lo() {
        return 0.0;
    }

    let p = dist.cdf_upper(x, 1.0);
    if p > alpha {
        brent_root(|t| dist.cdf_upper(x, t) - alpha, 0.0, 1.0, ROOT_TOLERANCE)
    } else if p < alpha {
        1.0 / brent_root(
            |t| dist.cdf_upper(x, 1.0 / t) - alpha,
            f64::EPSILON,
            1.0,
            ROOT_TOLERANCE,
        )
    } else {
        1.0
    }
}

/// Largest odds ratio not rejected by the lower-tail test at `alpha`.
fn upper_bound(dist: &NoncentralHypergeometric, x: usize, alpha: f64) -> f64 {
    if x == dist.hi() {
        return f64::INFINITY;
    }

    let p = dist.cdf_lower(x, 1.0);
    if p < alpha {
        brent_root(|t| dist.cdf_lower(x, t) - alpha, 0.0, 1.0, ROOT_TOLERANCE)
    } else if p > alpha {
        1.0 / brent_root(
            |t| dist.cdf_lower(x, 1.0 / t) - alpha,
            f64::EPSILON,
            1.0,
            ROOT_TOLERANCE,
        )
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmrError;

    fn close(actual: f64, expected: f64, rel: f64) -> bool {
        ((actual - expected) / expected).abs() < rel
    }

    #[test]
    fn test_tea_tasting() {
        let result = fisher_exact(&ContingencyTable::new(3, 1, 1, 3), 0.95).unwrap();

        assert!((result.p_value - 17.0 / 35.0).abs() < 1e-12);
        assert!((result.p_value_greater - 17.0 / 70.0).abs() < 1e-12);
        assert!((result.p_value_less - 69.0 / 70.0).abs() < 1e-12);
        assert!(close(result.conditional_odds_ratio, 6.408_32, 1e-4));
        assert!(close(result.ci_lower, 0.211_736, 1e-4));
        assert!(close(result.ci_upper, 626.2435, 1e-4));
    }

    #[test]
    fn test_strong_association() {
        let result = fisher_exact(&ContingencyTable::new(12, 5, 3, 20), 0.95).unwrap();

        assert!(close(result.p_value, 2.999_894e-4, 1e-4));
        assert!(close(result.conditional_odds_ratio, 14.570_03, 1e-4));
        assert!(close(result.ci_lower, 2.656_885, 1e-4));
        assert!(close(result.ci_upper, 113.3394, 1e-4));
    }

    #[test]
    fn test_inverse_association() {
        let result = fisher_exact(&ContingencyTable::new(1, 9, 11, 3), 0.95).unwrap();

        assert!(close(result.p_value, 2.759_456e-3, 1e-4));
        assert!(close(result.conditional_odds_ratio, 0.037_209_08, 1e-4));
        assert!(result.ci_upper < 1.0);
    }

    #[test]
    fn test_balanced_table() {
        let result = fisher_exact(&ContingencyTable::new(5, 5, 5, 5), 0.95).unwrap();

        assert!((result.p_value - 1.0).abs() < 1e-9);
        assert!((result.conditional_odds_ratio - 1.0).abs() < 1e-9);
        assert!(close(result.ci_lower, 0.125_914_8, 1e-4));
        assert!(close(result.ci_upper, 7.941_877, 1e-4));
    }

    #[test]
    fn test_zero_cell_edges() {
        let result = fisher_exact(&ContingencyTable::new(10, 0, 5, 8), 0.95).unwrap();

        assert!((result.p_value - 3108.0 / 1_144_066.0).abs() < 1e-12);
        assert_eq!(result.conditional_odds_ratio, f64::INFINITY);
        assert_eq!(result.ci_upper, f64::INFINITY);
        assert!(close(result.ci_lower, 2.129_79, 1e-4));
    }

    #[test]
    fn test_degenerate_table_rejected() {
        let err = fisher_exact(&ContingencyTable::new(0, 0, 5, 8), 0.95).unwrap_err();
        assert!(matches!(err, AmrError::DegenerateTable { .. }));
    }

    #[test]
    fn test_confidence_level_outside_unit_interval_rejected() {
        let table = ContingencyTable::new(12, 5, 3, 20);
        for level in [0.0, 1.0, 1.5, -1.0, f64::NAN] {
            let err = fisher_exact(&table, level).unwrap_err();
            assert!(matches!(err, AmrError::Config(_)), "level {level}: {err}");
        }
    }

    #[test]
    fn test_confidence_level_checked_before_table() {
        let err = fisher_exact(&ContingencyTable::new(0, 0, 5, 8), 2.0).unwrap_err();
        assert!(matches!(err, AmrError::Config(_)));
    }

    #[test]
    fn test_transpose_keeps_p_value() {
        let a = fisher_exact(&ContingencyTable::new(7, 2, 3, 9), 0.95).unwrap();
        let b = fisher_exact(&ContingencyTable::new(7, 3, 2, 9), 0.95).unwrap();
        assert!((a.p_value - b.p_value).abs() < 1e-12);
        assert!(close(a.conditional_odds_ratio, b.conditional_odds_ratio, 1e-8));
    }
}
