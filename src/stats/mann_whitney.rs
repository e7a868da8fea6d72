//! Mann-Whitney U rank-sum test
//!
//! Small samples use the exact distribution of U: up to 50 values per sample
//! without ties, up to 25 with ties. Everything else uses the normal
//! approximation with tie and continuity corrections.

use super::normal::standard_cdf;
use super::StatsError;

/// Largest per-sample size for which the exact U distribution is computed
const EXACT_LIMIT: usize = 50;

/// Largest per-sample size for the exact distribution when values are tied
const TIES_EXACT_LIMIT: usize = 25;

/// Alternative hypothesis of a location test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationHypothesis {
    /// The first sample is located below the second
    LocationLess,
    /// The two samples have different locations (two-sided)
    LocationDiffers,
    /// The first sample is located above the second
    LocationGreater,
}

/// Outcome of [`mann_whitney_u_test`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitneyUResult {
    pub n1: usize,
    pub n2: usize,
    /// U statistic of the first sample, fractional when ties are present
    pub u: f64,
    pub alternative: LocationHypothesis,
    /// p-value under the alternative hypothesis
    pub p: f64,
}

/// Rank summary of the merged samples
struct Ranking {
    /// Sum of the ranks of the first sample
    rank_sum: f64,
    /// Sum of `t^3 - t` over every group of `t` tied values
    tie_correction: f64,
    /// Size of every group of equal values, in ascending value order
    groups: Vec<usize>,
}

impl Ranking {
    fn of(x1: &[f64], x2: &[f64]) -> Self {
        let mut merged: Vec<(f64, bool)> = x1
            .iter()
            .map(|&v| (v, true))
            .chain(x2.iter().map(|&v| (v, false)))
            .collect();
        merged.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut rank_sum = 0.0;
        let mut tie_correction = 0.0;
        let mut groups = Vec::new();
        let mut start = 0;
        while start < merged.len() {
            let mut end = start + 1;
            while end < merged.len() && merged[end].0 == merged[start].0 {
                end += 1;
            }
            // ranks are 1-based, the group shares the average of start+1..=end
            let avg_rank = (start + 1 + end) as f64 / 2.0;
            let from_first = merged[start..end].iter().filter(|(_, first)| *first).count();
            rank_sum += avg_rank * from_first as f64;

            let t = (end - start) as f64;
            tie_correction += t * t * t - t;
            groups.push(end - start);
            start = end;
        }

        Self {
            rank_sum,
            tie_correction,
            groups,
        }
    }

    fn has_ties(&self) -> bool {
        self.groups.iter().any(|&t| t > 1)
    }
}

/// Test whether `x1` and `x2` are drawn from distributions with the same location
///
/// Returns [`StatsError::SampleSize`] when either sample is empty and
/// [`StatsError::SamplesEqual`] when every value in both samples is the same.
pub fn mann_whitney_u_test(
    x1: &[f64],
    x2: &[f64],
    alternative: LocationHypothesis,
) -> Result<MannWhitneyUResult, StatsError> {
    let (n1, n2) = (x1.len(), x2.len());
    if n1 == 0 || n2 == 0 {
        return Err(StatsError::SampleSize);
    }

    let first = x1[0];
    if x1.iter().chain(x2).all(|&v| v == first) {
        return Err(StatsError::SamplesEqual);
    }

    let ranking = Ranking::of(x1, x2);
    let u = ranking.rank_sum - (n1 * (n1 + 1)) as f64 / 2.0;

    let has_ties = ranking.has_ties();
    let limit = if has_ties { TIES_EXACT_LIMIT } else { EXACT_LIMIT };
    let p = if n1 <= limit && n2 <= limit {
        let dist = if has_ties {
            UDistribution::with_ties(n1, n2, &ranking.groups)
        } else {
            UDistribution::without_ties(n1, n2)
        };
        dist.p_value(u, alternative)
    } else {
        normal_p_value(n1, n2, u, ranking.tie_correction, alternative)?
    };

    Ok(MannWhitneyUResult {
        n1,
        n2,
        u,
        alternative,
        p,
    })
}

fn combine_tails(less: f64, greater: f64, alternative: LocationHypothesis) -> f64 {
    match alternative {
        LocationHypothesis::LocationLess => less,
        LocationHypothesis::LocationGreater => greater,
        LocationHypothesis::LocationDiffers => (2.0 * less.min(greater)).min(1.0),
    }
}

/// Exact null distribution of U, indexed by `2U` so half ranks fit
struct UDistribution {
    counts: Vec<f64>,
    total: f64,
}

impl UDistribution {
    fn new(counts: Vec<f64>) -> Self {
        let total = counts.iter().sum();
        Self { counts, total }
    }

    fn without_ties(n1: usize, n2: usize) -> Self {
        let mut counts = vec![0.0; 2 * n1 * n2 + 1];
        for (u, count) in u_distribution(n1, n2).into_iter().enumerate() {
            counts[2 * u] = count;
        }
        Self::new(counts)
    }

    /// Distribution of U when the merged sample has tie groups of the given sizes
    ///
    /// Every way of choosing which members of each group belong to the
    /// first sample is equally likely. A first-sample value scores 2 (in
    /// doubled units) against each second-sample value in an earlier group
    /// and 1 against each second-sample value in its own group.
    fn with_ties(n1: usize, n2: usize, groups: &[usize]) -> Self {
        let max_two_u = 2 * n1 * n2;
        // table[k][2u]: arrangements of the groups seen so far holding k first-sample values
        let mut table = vec![vec![0.0; max_two_u + 1]; n1 + 1];
        table[0][0] = 1.0;
        let mut seen = 0;

        for &t in groups {
            let mut next = vec![vec![0.0; max_two_u + 1]; n1 + 1];
            for k in 0..=n1.min(seen) {
                let below = seen - k;
                for (two_u, &count) in table[k].iter().enumerate() {
                    if count == 0.0 {
                        continue;
                    }
                    for x in 0..=t.min(n1 - k) {
                        if t - x > n2 - below {
                            continue;
                        }
                        let step = 2 * x * below + x * (t - x);
                        next[k + x][two_u + step] += count * binomial(t, x);
                    }
                }
            }
            table = next;
            seen += t;
        }

        Self::new(table.swap_remove(n1))
    }

    fn index(u: f64) -> Option<usize> {
        let two_u = (2.0 * u).round();
        (two_u >= 0.0).then_some(two_u as usize)
    }

    /// P(U <= u)
    fn cdf(&self, u: f64) -> f64 {
        match Self::index(u) {
            None => 0.0,
            Some(i) => {
                let end = i.min(self.counts.len() - 1);
                self.counts[..=end].iter().sum::<f64>() / self.total
            }
        }
    }

    /// P(U >= u)
    fn sf(&self, u: f64) -> f64 {
        let start = Self::index(u).unwrap_or(0).min(self.counts.len());
        self.counts[start..].iter().sum::<f64>() / self.total
    }

    fn p_value(&self, u: f64, alternative: LocationHypothesis) -> f64 {
        combine_tails(self.cdf(u), self.sf(u), alternative)
    }
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Number of orderings of `n1 + n2` distinct values for each possible U
///
/// Index `u` of the returned vector holds the count for `U = u`, where U
/// counts pairs with the first-sample value above the second-sample value.
fn u_distribution(n1: usize, n2: usize) -> Vec<f64> {
    let max_u = n1 * n2;
    let unit = {
        let mut poly = vec![0.0; max_u + 1];
        poly[0] = 1.0;
        poly
    };

    // row[j] holds the distribution for (m, j) samples
    let mut row: Vec<Vec<f64>> = vec![unit.clone(); n2 + 1];
    for _ in 1..=n1 {
        let mut next = Vec::with_capacity(n2 + 1);
        next.push(unit.clone());
        for j in 1..=n2 {
            // largest value from the second sample adds nothing to U,
            // from the first sample it beats all j second-sample values
            let mut poly = next[j - 1].clone();
            for u in j..=max_u {
                poly[u] += row[j][u - j];
            }
            next.push(poly);
        }
        row = next;
    }

    row.swap_remove(n2)
}

fn normal_p_value(
    n1: usize,
    n2: usize,
    u: f64,
    tie_correction: f64,
    alternative: LocationHypothesis,
) -> Result<f64, StatsError> {
    let (a, b) = (n1 as f64, n2 as f64);
    let n = a + b;
    let mu = a * b / 2.0;
    let variance = a * b / 12.0 * ((n + 1.0) - tie_correction / (n * (n - 1.0)));
    if variance <= 0.0 {
        // only reachable when every value is tied
        return Err(StatsError::SamplesEqual);
    }
    let sigma = variance.sqrt();

    let less = standard_cdf((u + 0.5 - mu) / sigma);
    let greater = standard_cdf((mu - u + 0.5) / sigma);

    Ok(combine_tails(less, greater, alternative))
}
