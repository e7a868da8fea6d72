//! Statistics used to compare benchmark samples
//!
//! Descriptive helpers ([`percentile`], [`mean`], [`bounds`]) operate on
//! plain `f64` slices. [`mann_whitney_u_test`] decides whether two samples
//! come from distributions with different locations.

pub mod mann_whitney;
mod normal;

pub use mann_whitney::{mann_whitney_u_test, LocationHypothesis, MannWhitneyUResult};

use thiserror::Error;

/// Errors produced by significance tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("all samples are equal")]
    SamplesEqual,
    #[error("sample is too small")]
    SampleSize,
}

/// Return the `pctile`th value of a sorted sample
///
/// Uses interpolation method R8 from Hyndman and Fan (1996). `pctile` is
/// capped to `[0, 1]`. An empty sample yields NaN.
///
/// `percentile(xs, 0.5)` is the median, `0.25` and `0.75` are the first and
/// third quartiles.
pub fn percentile(xs: &[f64], pctile: f64) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let pctile = pctile.clamp(0.0, 1.0);
    let count = xs.len() as f64;
    let n = 1.0 / 3.0 + pctile * (count + 1.0 / 3.0);
    let k = n.floor();
    let frac = n - k;

    if k <= 0.0 {
        return xs[0];
    }
    let k = k as usize;
    if k >= xs.len() {
        return xs[xs.len() - 1];
    }
    xs[k - 1] + frac * (xs[k] - xs[k - 1])
}

/// Arithmetic mean, NaN for an empty sample
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter()
        .enumerate()
        .fold(0.0, |m, (i, x)| m + (x - m) / (i + 1) as f64)
}

/// Minimum and maximum of a sample, `(NaN, NaN)` when empty
pub fn bounds(xs: &[f64]) -> (f64, f64) {
    let Some(&first) = xs.first() else {
        return (f64::NAN, f64::NAN);
    };
    xs.iter()
        .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x)))
}
