//! Fisher's non-central hypergeometric distribution of the top-left cell
//! of a 2×2 table with fixed margins.

/// Distribution of `X`, the count in cell (1, 1), given column totals `m`
/// and `n` and first-row total `k`, under odds ratio `ncp`.
#[derive(Debug, Clone)]
pub(crate) struct NoncentralHypergeometric {
    lo: usize,
    hi: usize,
    /// log P(X = x | ncp = 1) for x in lo..=hi.
    log_central: Vec<f64>,
}

impl NoncentralHypergeometric {
    pub(crate) fn new(m: usize, n: usize, k: usize) -> Self {
        let lo = k.saturating_sub(n);
        let hi = k.min(m);

        let ln_factorial = ln_factorial_table(m + n);
        let ln_choose = |total: usize, pick: usize| {
            ln_factorial[total] - ln_factorial[pick] - ln_factorial[total - pick]
        };

        let log_central = (lo..=hi)
            .map(|x| ln_choose(m, x) + ln_choose(n, k - x) - ln_choose(m + n, k))
            .collect();

        Self { lo, hi, log_central }
    }

    pub(crate) fn lo(&self) -> usize {
        self.lo
    }

    pub(crate) fn hi(&self) -> usize {
        self.hi
    }

    fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.lo..=self.hi
    }

    /// Probability mass over the support for odds ratio `ncp`.
    pub(crate) fn density(&self, ncp: f64) -> Vec<f64> {
        if ncp == 0.0 {
            return self.point_mass(self.lo);
        }
        if ncp.is_infinite() {
            return self.point_mass(self.hi);
        }

        let log_ncp = ncp.ln();
        let mut d: Vec<f64> = self
            .log_central
            .iter()
            .zip(self.support())
            .map(|(l, x)| l + log_ncp * x as f64)
            .collect();

        let max = d.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for v in d.iter_mut() {
            *v = (*v - max).exp();
        }
        let total: f64 = d.iter().sum();
        for v in d.iter_mut() {
            *v /= total;
        }
        d
    }

    fn point_mass(&self, at: usize) -> Vec<f64> {
        self.support()
            .map(|x| if x == at { 1.0 } else { 0.0 })
            .collect()
    }

    /// Probability of exactly `x`.
    pub(crate) fn probability(&self, x: usize, ncp: f64) -> f64 {
        if x < self.lo || x > self.hi {
            return 0.0;
        }
        self.density(ncp)[x - self.lo]
    }

    /// Expected value of `X`.
    pub(crate) fn mean(&self, ncp: f64) -> f64 {
        if ncp == 0.0 {
            return self.lo as f64;
        }
        if ncp.is_infinite() {
            return self.hi as f64;
        }
        self.density(ncp)
            .iter()
            .zip(self.support())
            .map(|(p, x)| p * x as f64)
            .sum()
    }

    /// P(X <= q).
    pub(crate) fn cdf_lower(&self, q: usize, ncp: f64) -> f64 {
        self.density(ncp)
            .iter()
            .zip(self.support())
            .filter(|(_, x)| *x <= q)
            .map(|(p, _)| p)
            .sum()
    }

    /// P(X >= q).
    pub(crate) fn cdf_upper(&self, q: usize, ncp: f64) -> f64 {
        self.density(ncp)
            .iter()
            .zip(self.support())
            .filter(|(_, x)| *x >= q)
            .map(|(p, _)| p)
            .sum()
    }
}

/// `ln(i!)` for `i` in `0..=n`, by cumulative summation.
fn ln_factorial_table(n: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(n + 1);
    let mut acc = 0.0;
    table.push(acc);
    for i in 1..=n {
        acc += (i as f64).ln();
        table.push(acc);
    }
    table
}
